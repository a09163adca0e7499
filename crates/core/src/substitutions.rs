use std::fmt;

/// Fictional ingredient phrases (lowercase) and what to buy instead.
/// Order is the print order of the substitutions addendum.
pub const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("moonbeam sugar", "granulated sugar"),
    ("starlight zest", "lemon or orange zest"),
    ("powdered dragon scales", "cinnamon or chili powder"),
    ("crystalized honey", "honey"),
    ("enchanted maple syrup", "maple syrup"),
    ("unicorn milk", "whole milk or heavy cream"),
    ("mermaid tears", "lemon juice or rosewater"),
    ("phoenix ash", "smoked paprika"),
    ("fairy nectar", "honey or agave syrup"),
    ("wizard's brew", "strong tea or coffee"),
    ("goblin gold flakes", "edible gold leaf or yellow sprinkles"),
    ("levitation powder", "baking powder"),
    ("time-turning sugar", "brown sugar"),
    ("whispering wind salt", "sea salt"),
    ("magical moonstone dust", "vanilla sugar"),
    ("dragon's breath peppers", "chili peppers or cayenne"),
    ("fairy dust", "powdered sugar or cinnamon sugar"),
    ("wizard's broth", "vegetable or chicken broth"),
    ("dragon scale salt", "smoked salt"),
    ("moonlit herbs", "fresh herbs"),
    ("forest mushroom powder", "dried mushroom powder"),
    ("enchanted garlic", "roasted garlic"),
    ("thunderstruck pepper", "black pepper"),
    ("mystical thyme", "thyme"),
    ("fae rosemary", "rosemary"),
    ("goblin's favorite spice blend", "mixed herbs and spices"),
    ("crystallized vegetable stock", "vegetable bouillon"),
    ("magical butter", "butter"),
    ("fairy butter", "cultured butter"),
    ("unicorn butter", "European-style butter"),
    ("magical thickener", "cornstarch or flour"),
    ("magical fat", "butter or oil"),
    ("enchanted oil", "olive oil"),
    ("wizard's cheese blend", "mixed grated cheeses"),
    ("magical onions", "caramelized onions"),
    ("dragon eggs", "large eggs"),
    ("phoenix eggs", "duck eggs"),
    ("fairy eggs", "quail eggs"),
    ("magical stock", "homemade stock"),
    ("enchanted berries", "mixed berries"),
    ("fairy cream", "whipped cream"),
    ("wizard's herb blend", "Italian herb blend"),
];

/// One matched entry of the substitution table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitution {
    pub magical: &'static str,
    pub real: &'static str,
}

impl Substitution {
    /// `"<magical> → <real>"`
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.magical, self.real)
    }
}

/// Returns every table entry whose key appears (case-insensitively) inside at
/// least one ingredient. Results follow table order, not ingredient order.
pub fn find_substitutions<'a, I>(ingredients: I) -> Vec<Substitution>
where
    I: IntoIterator<Item = &'a str>,
{
    let lowered: Vec<String> = ingredients.into_iter().map(str::to_lowercase).collect();
    SUBSTITUTIONS
        .iter()
        .filter(|(magical, _)| lowered.iter().any(|item| item.contains(magical)))
        .map(|&(magical, real)| Substitution { magical, real })
        .collect()
}
