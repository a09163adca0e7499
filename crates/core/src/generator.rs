//! Random recipe assembly from curated word lists.
//!
//! Every function takes the random source as a parameter so callers (and
//! tests) decide between a seeded generator and thread-local entropy.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::recipe::{IngredientGroups, PieType, Recipe};

const SWEET_PIES: &[&str] = &[
    "Apple",
    "Cherry",
    "Blueberry",
    "Pumpkin",
    "Pecan",
    "Strawberry",
    "Lemon Meringue",
    "Key Lime",
    "Chocolate",
    "Banana Cream",
    "Coconut Cream",
    "Moon",
    "Wizard's",
    "Dragon Fruit",
    "Enchanted Berry",
    "Mystical Maple",
    "Fairy's Favorite",
    "Unicorn Dream",
    "Phoenix Fire",
    "Mermaid's Pearl",
];

const SAVORY_PIES: &[&str] = &[
    "Shepherd's",
    "Chicken Pot",
    "Stargazy",
    "Steak and Ale",
    "Forest Mushroom",
    "Leek and Cheddar",
    "Spinach and Feta",
    "Magical Mincemeat",
    "Goblin's Gold",
    "Dragon's Den",
    "Wizard's Hearth",
    "Moonlit Meadow",
];

const TITLE_PREFIXES: &[&str] = &[
    "Magical",
    "Enchanted",
    "Wizard's",
    "Mystical",
    "Spellbound",
    "Secret",
    "Ancient",
    "Celestial",
];

const TITLE_SUFFIXES: &[&str] = &[
    "Delight", "Wonder", "Surprise", "Dream", "Spell", "Creation", "Pie", "Charm", "Treasure",
];

const SWEET_CRUST_FATS: &[&str] = &["butter", "magical butter", "fairy butter", "unicorn butter"];
const SAVORY_CRUST_FATS: &[&str] = &["butter", "lard", "magical fat", "unicorn butter"];
const SWEET_CRUST_LIQUIDS: &[&str] = &["water", "milk", "cream", "unicorn milk"];
const SAVORY_CRUST_LIQUIDS: &[&str] = &["water", "buttermilk", "wizard's brew"];

const FRUITS: &[&str] = &[
    "fresh apples",
    "cherries",
    "blueberries",
    "strawberries",
    "peaches",
    "blackberries",
    "raspberries",
    "mangoes",
    "dragon fruit",
    "star fruit",
];

const FRUIT_CUTS: &[&str] = &["sliced", "diced", "chopped", "whole"];

const SWEETENERS: &[&str] = &["sugar", "brown sugar", "maple sugar", "honey", "moonbeam sugar"];

const CREAMS: &[&str] = &[
    "vanilla custard",
    "chocolate ganache",
    "butterscotch pudding",
    "lemon curd",
    "caramel custard",
    "peanut butter filling",
    "marshmallow cream",
    "moonshadow cream",
    "whispering cloud custard",
    "enchanted vanilla bean",
];

const SPICES: &[&str] = &[
    "cinnamon",
    "nutmeg",
    "ginger",
    "cardamom",
    "allspice",
    "cloves",
    "vanilla beans",
    "dragon's breath peppers",
    "fairy dust",
    "star anise",
    "wizardroot",
    "thunder salt",
    "moonlight extract",
    "phoenix feather powder",
];

const THICKENERS: &[&str] = &[
    "cornstarch",
    "flour",
    "tapioca starch",
    "arrowroot",
    "magical thickener",
];

const EGGS: &[&str] = &["eggs", "dragon eggs", "phoenix eggs", "fairy eggs"];

const DAIRY: &[&str] = &[
    "heavy cream",
    "milk",
    "half-and-half",
    "unicorn milk",
    "fairy cream",
];

const SPECIAL_INGREDIENTS: &[&str] = &[
    "moonbeam sugar",
    "starlight zest",
    "powdered dragon scales",
    "crystalized honey",
    "enchanted maple syrup",
    "unicorn milk",
    "mermaid tears",
    "phoenix ash",
    "fairy nectar",
    "wizard's brew",
    "goblin gold flakes",
    "levitation powder",
    "time-turning sugar",
    "whispering wind salt",
    "magical moonstone dust",
];

const PROTEINS: &[&str] = &[
    "diced chicken",
    "ground beef",
    "braised lamb",
    "smoked fish",
    "cremini mushrooms",
    "lentils",
];

const VEGETABLES: &[&str] = &[
    "carrots",
    "peas",
    "leeks",
    "potatoes",
    "celery",
    "magical onions",
    "spinach",
];

const BROTHS: &[&str] = &[
    "wizard's broth",
    "magical stock",
    "crystallized vegetable stock",
    "beef stock",
];

const HERBS: &[&str] = &[
    "moonlit herbs",
    "mystical thyme",
    "fae rosemary",
    "wizard's herb blend",
    "goblin's favorite spice blend",
    "parsley",
];

const SEASONINGS: &[&str] = &[
    "dragon scale salt",
    "thunderstruck pepper",
    "enchanted garlic",
    "forest mushroom powder",
    "smoked paprika",
];

const SAVORY_FATS: &[&str] = &["olive oil", "enchanted oil", "magical fat", "butter"];

const SWEET_TOPPINGS: &[&str] = &[
    "whipped cream",
    "meringue",
    "streusel",
    "chopped nuts",
    "caramel drizzle",
    "chocolate shavings",
    "powdered sugar",
    "glittering stardust",
    "golden sparkles",
    "enchanted berries",
    "crystallized flower petals",
    "spun sugar webs",
    "shimmering pearl dust",
    "levitating marshmallows",
    "color-changing sprinkles",
];

const SAVORY_TOPPINGS: &[&str] = &[
    "wizard's cheese blend",
    "mashed potatoes",
    "toasted breadcrumbs",
    "crispy fried onions",
    "grated parmesan",
    "magical onions",
    "puff pastry lattice",
];

const BAKING_TEMPS_F: &[u32] = &[350, 375, 400, 425];

/// Builds a recipe of the requested type.
pub fn generate_recipe<R: Rng + ?Sized>(pie_type: PieType, rng: &mut R) -> Recipe {
    let title = generate_title(pie_type, rng);
    let crust = generate_crust(pie_type, rng);
    let filling = match pie_type {
        PieType::Sweet => generate_sweet_filling(rng),
        PieType::Savory => generate_savory_filling(rng),
    };
    let topping = generate_topping(pie_type, rng);
    let instructions = generate_instructions(pie_type, !topping.is_empty());

    let recipe = Recipe {
        id: generate_id(rng),
        title,
        pie_type,
        ingredients: IngredientGroups {
            crust,
            filling,
            topping: (!topping.is_empty()).then_some(topping),
        },
        instructions,
        baking_time: generate_baking_time(rng),
        baking_temp: generate_baking_temp(rng),
        servings: rng.gen_range(6..=12),
    };
    debug!(
        "generated {} recipe {:?} with {} ingredients",
        recipe.pie_type,
        recipe.title,
        recipe.ingredients.len()
    );
    recipe
}

/// Builds a recipe of a randomly chosen type.
pub fn generate_random_recipe<R: Rng + ?Sized>(rng: &mut R) -> Recipe {
    let pie_type = if rng.gen_bool(0.5) {
        PieType::Sweet
    } else {
        PieType::Savory
    };
    generate_recipe(pie_type, rng)
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn pick_many<'a, R: Rng + ?Sized>(
    rng: &mut R,
    items: &[&'a str],
    min: usize,
    max: usize,
) -> Vec<&'a str> {
    let count = rng.gen_range(min..=max);
    items.choose_multiple(rng, count).copied().collect()
}

fn generate_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    (0..12)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

fn generate_title<R: Rng + ?Sized>(pie_type: PieType, rng: &mut R) -> String {
    let base = match pie_type {
        PieType::Sweet => pick(rng, SWEET_PIES),
        PieType::Savory => pick(rng, SAVORY_PIES),
    };
    if rng.gen_bool(0.5) {
        return format!("{} {base}", pick(rng, TITLE_PREFIXES));
    }
    if rng.gen_bool(0.5) {
        return format!("{base} {}", pick(rng, TITLE_SUFFIXES));
    }
    base.to_string()
}

fn generate_baking_time<R: Rng + ?Sized>(rng: &mut R) -> String {
    let min = rng.gen_range(30..=60);
    let max = min + rng.gen_range(5..=15);
    format!("{min} - {max} minutes")
}

fn generate_baking_temp<R: Rng + ?Sized>(rng: &mut R) -> String {
    let temp = BAKING_TEMPS_F[rng.gen_range(0..BAKING_TEMPS_F.len())];
    format!("{temp}°F")
}

fn teaspoons<R: Rng + ?Sized>(rng: &mut R, what: &str) -> String {
    match rng.gen_range(1..=2) {
        1 => format!("1 teaspoon {what}"),
        n => format!("{n} teaspoons {what}"),
    }
}

/// Formats a count of quarter cups, e.g. 5 -> "1 1/4".
fn quarters(count: u32) -> String {
    let whole = count / 4;
    let fraction = match count % 4 {
        1 => "1/4",
        2 => "1/2",
        3 => "3/4",
        _ => "",
    };
    match (whole, fraction) {
        (0, f) => f.to_string(),
        (w, "") => w.to_string(),
        (w, f) => format!("{w} {f}"),
    }
}

fn generate_crust<R: Rng + ?Sized>(pie_type: PieType, rng: &mut R) -> Vec<String> {
    let (fats, liquids) = match pie_type {
        PieType::Sweet => (SWEET_CRUST_FATS, SWEET_CRUST_LIQUIDS),
        PieType::Savory => (SAVORY_CRUST_FATS, SAVORY_CRUST_LIQUIDS),
    };
    let mut items = vec![
        "2 cups flour".to_string(),
        "1 teaspoon salt".to_string(),
        format!(
            "{} tablespoons cold {}, cubed",
            rng.gen_range(6..=10),
            pick(rng, fats)
        ),
        format!(
            "{} tablespoons ice {}",
            rng.gen_range(4..=6),
            pick(rng, liquids)
        ),
    ];
    if rng.gen_bool(0.3) {
        items.push(format!("1 pinch of {}", pick(rng, SPECIAL_INGREDIENTS)));
    }
    items
}

fn generate_sweet_filling<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
    let mut items = Vec::new();
    if rng.gen_bool(0.6) {
        items.push(format!(
            "{} cups {}, {}",
            rng.gen_range(3..=6),
            pick(rng, FRUITS),
            pick(rng, FRUIT_CUTS)
        ));
        items.push(format!(
            "{} cup {}",
            quarters(rng.gen_range(3..=8)),
            pick(rng, SWEETENERS)
        ));
        for spice in pick_many(rng, SPICES, 1, 3) {
            items.push(teaspoons(rng, spice));
        }
        items.push(format!(
            "{} tablespoons {}",
            rng.gen_range(2..=4),
            pick(rng, THICKENERS)
        ));
    } else {
        items.push(format!("2 cups {}", pick(rng, CREAMS)));
        items.push(format!(
            "{} large {}",
            rng.gen_range(2..=4),
            pick(rng, EGGS)
        ));
        items.push(format!("1 cup {}", pick(rng, DAIRY)));
        items.push(teaspoons(rng, "vanilla extract"));
        if rng.gen_bool(0.5) {
            items.push(format!("2 tablespoons {}", pick(rng, SPECIAL_INGREDIENTS)));
        }
    }
    items
}

fn generate_savory_filling<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
    let mut items = vec![
        format!("{} pounds {}", rng.gen_range(1..=2), pick(rng, PROTEINS)),
        format!("2 tablespoons {}", pick(rng, SAVORY_FATS)),
    ];
    for vegetable in pick_many(rng, VEGETABLES, 1, 3) {
        items.push(format!("{} cup {vegetable}", quarters(rng.gen_range(2..=6))));
    }
    items.push(format!(
        "{} cups {}",
        rng.gen_range(1..=2),
        pick(rng, BROTHS)
    ));
    for herb in pick_many(rng, HERBS, 1, 2) {
        items.push(teaspoons(rng, herb));
    }
    let seasoning = pick(rng, SEASONINGS);
    items.push(teaspoons(rng, seasoning));
    items.push(format!(
        "{} tablespoons {}",
        rng.gen_range(2..=3),
        pick(rng, THICKENERS)
    ));
    items
}

fn generate_topping<R: Rng + ?Sized>(pie_type: PieType, rng: &mut R) -> Vec<String> {
    if rng.gen_bool(0.3) {
        return Vec::new();
    }
    let pool = match pie_type {
        PieType::Sweet => SWEET_TOPPINGS,
        PieType::Savory => SAVORY_TOPPINGS,
    };
    let main = pick(rng, pool);
    let mut items = vec![format!("1 cup {main}")];
    if rng.gen_bool(0.4) {
        let others: Vec<&str> = pool.iter().copied().filter(|t| *t != main).collect();
        items.push(format!(
            "{} tablespoons {}",
            rng.gen_range(2..=4),
            pick(rng, &others)
        ));
    }
    items
}

fn generate_instructions(pie_type: PieType, has_topping: bool) -> Vec<String> {
    let mix_step = match pie_type {
        PieType::Sweet => {
            "Mix the filling ingredients in a cauldron (or regular bowl) until well combined."
        }
        PieType::Savory => {
            "Brown the filling ingredients in a cauldron (or heavy pan), add the broth and simmer until thickened."
        }
    };
    let mut steps = vec![
        "Preheat your oven with a wave of your wand (or just turn the knob).",
        "Prepare the crust by mixing dry ingredients, then incorporate the cold butter until the mixture resembles coarse crumbs. Add liquid gradually until the dough forms. Chill for 30 minutes.",
        "Roll out the dough and transfer to a pie dish. Perform a silent incantation (optional) for extra flakiness.",
        mix_step,
        "Pour the filling into the prepared crust, ensuring even distribution of the magical energies (and ingredients).",
    ];
    if has_topping {
        steps.push(
            "Prepare the topping according to the ancient scrolls (or just follow common sense).",
        );
        steps.push(
            "Add the topping to the pie, creating mystical patterns for enhanced flavor transmission.",
        );
    }
    steps.push("Bake in the preheated oven until the crust is golden and the filling has set.");
    steps.push("Allow to cool while contemplating the universe (or just for about an hour).");
    steps.push(
        "Slice with an enchanted blade (or regular knife) and serve to grateful recipients.",
    );
    steps.into_iter().map(str::to_string).collect()
}
