/// Furniture geometry template used to draw a placed product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Archetype {
    Sofa,
    DiningTable,
    Chair,
    Bed,
    CoffeeTable,
    Bookshelf,
    Desk,
    Armchair,
    Sideboard,
    Plant,
    Lamp,
}

impl Archetype {
    pub const ALL: [Archetype; 11] = [
        Archetype::Sofa,
        Archetype::DiningTable,
        Archetype::Chair,
        Archetype::Bed,
        Archetype::CoffeeTable,
        Archetype::Bookshelf,
        Archetype::Desk,
        Archetype::Armchair,
        Archetype::Sideboard,
        Archetype::Plant,
        Archetype::Lamp,
    ];

    /// Returned when neither a name rule nor a category rule matches.
    pub const FALLBACK: Archetype = Archetype::CoffeeTable;

    pub fn label(self) -> &'static str {
        match self {
            Self::Sofa => "Sofa",
            Self::DiningTable => "Dining Table",
            Self::Chair => "Chair",
            Self::Bed => "Bed",
            Self::CoffeeTable => "Coffee Table",
            Self::Bookshelf => "Bookshelf",
            Self::Desk => "Desk",
            Self::Armchair => "Armchair",
            Self::Sideboard => "Sideboard",
            Self::Plant => "Plant",
            Self::Lamp => "Lamp",
        }
    }

    /// Body color used when the placed item has no override.
    pub fn default_color(self) -> &'static str {
        match self {
            Self::Sofa => "#4A5568",
            Self::DiningTable => "#8B4513",
            Self::Chair => "#6B7280",
            Self::Bed => "#E5E7EB",
            Self::CoffeeTable => "#92400E",
            Self::Bookshelf => "#78350F",
            Self::Desk => "#713F12",
            Self::Armchair => "#7C2D12",
            Self::Sideboard => "#92400E",
            Self::Plant => "#059669",
            Self::Lamp => "#F3F4F6",
        }
    }

    /// Plants and lamps have fixed materials and ignore recoloring.
    pub fn is_tintable(self) -> bool {
        !matches!(self, Self::Plant | Self::Lamp)
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleField {
    Name,
    Category,
}

struct ArchetypeRule {
    field: RuleField,
    needles: &'static [&'static str],
    archetype: Archetype,
}

const fn name_rule(needles: &'static [&'static str], archetype: Archetype) -> ArchetypeRule {
    ArchetypeRule {
        field: RuleField::Name,
        needles,
        archetype,
    }
}

const fn category_rule(needles: &'static [&'static str], archetype: Archetype) -> ArchetypeRule {
    ArchetypeRule {
        field: RuleField::Category,
        needles,
        archetype,
    }
}

// Priority order. All name rules run before any category rule, and
// "dining table" must stay ahead of anything that could match "table".
const RULES: &[ArchetypeRule] = &[
    name_rule(&["sofa"], Archetype::Sofa),
    name_rule(&["dining table"], Archetype::DiningTable),
    name_rule(&["dining chair", "dining chairs"], Archetype::Chair),
    name_rule(&["bed"], Archetype::Bed),
    name_rule(&["coffee table"], Archetype::CoffeeTable),
    name_rule(&["bookshelf", "bookcase"], Archetype::Bookshelf),
    name_rule(&["desk"], Archetype::Desk),
    name_rule(&["armchair"], Archetype::Armchair),
    name_rule(&["cabinet", "sideboard"], Archetype::Sideboard),
    name_rule(&["plant"], Archetype::Plant),
    name_rule(&["lamp"], Archetype::Lamp),
    category_rule(&["bedroom"], Archetype::Bed),
    category_rule(&["office"], Archetype::Desk),
    category_rule(&["dining"], Archetype::DiningTable),
    category_rule(&["living"], Archetype::Sofa),
];

/// Maps a catalog item onto a furniture template by case-insensitive
/// substring matching, name first, then category.
pub fn archetype_for(product_name: &str, category: &str) -> Archetype {
    let name = product_name.to_lowercase();
    let category = category.to_lowercase();
    RULES
        .iter()
        .find(|rule| {
            let haystack = match rule.field {
                RuleField::Name => &name,
                RuleField::Category => &category,
            };
            rule.needles.iter().any(|needle| haystack.contains(needle))
        })
        .map(|rule| rule.archetype)
        .unwrap_or(Archetype::FALLBACK)
}
