use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, LevelFilter};
use piecraft_core::{generate_random_recipe, generate_recipe, render_card, PieType, Recipe};
use piecraft_printing::{
    export_recipe, preview_file_name, render_page_previews, Artifact, ArtifactSink, FileSink,
    RecipeLayoutEngine, PNG_MEDIA_TYPE,
};
use piecraft_settings::PreferencesStore;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(
    name = "piecraft-cli",
    version,
    about = "Whimsical pie recipe generator and PDF exporter"
)]
struct Cli {
    /// 工作區根目錄（偏好設定所在）。 / Workspace root holding `.piecraft/preferences.json`.
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
    /// 顯示除錯訊息。 / Enable debug logging (RUST_LOG still applies).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 產生隨機食譜。 / Generate a random recipe and print it.
    Generate(GenerateArgs),
    /// 顯示食譜檔案。 / Print the recipe card for a recipe JSON file.
    Show(ShowArgs),
    /// 匯出食譜 PDF。 / Export a recipe to `<slug>_recipe.pdf`.
    Export(ExportArgs),
    /// 管理偏好設定。 / Manage export preferences.
    #[command(subcommand)]
    Preferences(PreferencesCommand),
}

#[derive(Clone, Copy, ValueEnum)]
enum PieTypeArg {
    Sweet,
    Savory,
}

impl From<PieTypeArg> for PieType {
    fn from(value: PieTypeArg) -> Self {
        match value {
            PieTypeArg::Sweet => PieType::Sweet,
            PieTypeArg::Savory => PieType::Savory,
        }
    }
}

#[derive(Args)]
struct RecipeSource {
    /// 食譜 JSON 檔案；省略時隨機產生。 / Recipe JSON file; generated when omitted.
    #[arg(long, value_name = "FILE", conflicts_with_all = ["pie_type", "seed"])]
    recipe: Option<PathBuf>,
    /// 派的種類。 / Pie type for generated recipes (random when omitted).
    #[arg(long = "type", value_enum, value_name = "TYPE")]
    pie_type: Option<PieTypeArg>,
    /// 隨機種子。 / Seed for reproducible generation.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
}

#[derive(Args)]
struct GenerateArgs {
    /// 派的種類。 / Pie type (random when omitted).
    #[arg(long = "type", value_enum, value_name = "TYPE")]
    pie_type: Option<PieTypeArg>,
    /// 隨機種子。 / Seed for reproducible generation.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// 以 JSON 輸出。 / Print the recipe as JSON instead of a card.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ShowArgs {
    /// 食譜 JSON 檔案。 / Recipe JSON file.
    #[arg(value_name = "FILE")]
    recipe: PathBuf,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    source: RecipeSource,
    /// 輸出目錄，預設為工作區。 / Output directory (defaults to the workspace).
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// 同時輸出 PNG 預覽。 / Also write PNG page previews.
    #[arg(long)]
    preview: bool,
}

#[derive(Subcommand)]
enum PreferencesCommand {
    /// 顯示目前偏好設定。 / Print the effective preferences as JSON.
    Show,
    /// 還原預設值。 / Restore defaults (previous file kept as `.bak`).
    Reset,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        workspace,
        verbose,
        command,
    } = Cli::parse();
    init_logging(verbose);

    match command {
        Commands::Generate(args) => execute_generate(args),
        Commands::Show(args) => execute_show(args),
        Commands::Export(args) => {
            let workspace_root = resolve_workspace(workspace)?;
            execute_export(args, &workspace_root)
        }
        Commands::Preferences(subcommand) => {
            let workspace_root = resolve_workspace(workspace)?;
            execute_preferences_command(subcommand, &workspace_root)
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    builder.parse_default_env();
    builder.format_timestamp(None);
    let _ = builder.try_init();
}

fn execute_generate(args: GenerateArgs) -> Result<()> {
    let recipe = generate(args.pie_type, args.seed);
    if args.json {
        let json = serde_json::to_string_pretty(&recipe).context("serialize recipe")?;
        println!("{json}");
    } else {
        print!("{}", render_card(&recipe));
    }
    Ok(())
}

fn execute_show(args: ShowArgs) -> Result<()> {
    let recipe = load_recipe(&resolve_input_path(&args.recipe)?)?;
    print!("{}", render_card(&recipe));
    Ok(())
}

fn execute_export(args: ExportArgs, workspace_root: &Path) -> Result<()> {
    let recipe = match &args.source.recipe {
        Some(path) => load_recipe(&resolve_input_path(path)?)?,
        None => generate(args.source.pie_type, args.source.seed),
    };

    let prefs_path = PreferencesStore::default_path(workspace_root);
    let store = PreferencesStore::load(&prefs_path)
        .with_context(|| format!("failed to load preferences from {}", prefs_path.display()))?;
    let prefs = store.preferences();
    let options = prefs.to_export_options();

    let output_dir = match &args.output {
        Some(dir) => resolve_input_path(dir)?,
        None => workspace_root.to_path_buf(),
    };
    let sink = FileSink::new(&output_dir);

    let result = export_recipe(&RecipeLayoutEngine::new(), &recipe, &options, &sink, None)
        .with_context(|| format!("failed to export '{}'", recipe.title))?;
    debug!(
        "layout: tier {:?}, {} substitution(s)",
        result.summary.tier, result.summary.substitution_count
    );
    println!("{}", sink.path_for(&result.file_name).display());

    if args.preview || prefs.preview.enabled {
        // Page files use the smallest configured zoom.
        let zoom = prefs.preview.zoom_levels.first().copied().unwrap_or(50);
        let previews =
            render_page_previews(&result.pages, &options, zoom, prefs.preview.base_dpi)
                .context("failed to render previews")?;
        for (page, entry) in previews {
            let file_name = preview_file_name(&recipe, page);
            sink.deliver(&Artifact {
                file_name: &file_name,
                media_type: PNG_MEDIA_TYPE,
                data: &entry.data,
            })
            .with_context(|| format!("failed to write preview {file_name}"))?;
            println!("{}", sink.path_for(&file_name).display());
        }
    }
    Ok(())
}

fn execute_preferences_command(command: PreferencesCommand, workspace_root: &Path) -> Result<()> {
    let prefs_path = PreferencesStore::default_path(workspace_root);
    let mut store = PreferencesStore::load(&prefs_path)
        .with_context(|| format!("failed to load preferences from {}", prefs_path.display()))?;
    match command {
        PreferencesCommand::Show => {
            let json = serde_json::to_string_pretty(store.preferences())
                .context("serialize preferences")?;
            println!("{json}");
        }
        PreferencesCommand::Reset => {
            store
                .reset()
                .with_context(|| format!("failed to reset {}", prefs_path.display()))?;
            println!("Reset preferences at {}", store.path().display());
        }
    }
    Ok(())
}

fn generate(pie_type: Option<PieTypeArg>, seed: Option<u64>) -> Recipe {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    match pie_type {
        Some(pie_type) => generate_recipe(pie_type.into(), &mut rng),
        None => generate_random_recipe(&mut rng),
    }
}

fn load_recipe(path: &Path) -> Result<Recipe> {
    if !path.exists() {
        bail!("recipe file '{}' does not exist", path.display());
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let recipe: Recipe = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse recipe {}", path.display()))?;
    recipe
        .validate()
        .with_context(|| format!("invalid recipe {}", path.display()))?;
    Ok(recipe)
}

fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => resolve_input_path(&path),
        None => std::env::current_dir().context("determine current directory"),
    }
}

fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path))
    }
}
