use serde::{Deserialize, Serialize};

/// Closed set of article topic tags.
///
/// Validation and display both derive from this enum: the wire identifier is
/// the snake_case variant name (e.g. `nature_geography`), and the display
/// label and URL slug come from explicit mapping tables rather than string
/// transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NatureGeography,
    PlantResearch,
    AnimalProtection,
    SpaceExploration,
    SchoolEducation,
    TechnologyInvention,
    CultureHistory,
    LanguageEvolution,
    EntertainmentSports,
    ObjectsMaterials,
    FashionTrends,
    DietHealth,
    ArchitecturePlaces,
    TransportationTravel,
    NationalGovernment,
    SocietyEconomy,
    LawsRegulations,
    BattlefieldContention,
    SocialRoles,
    BehaviorActions,
    PhysicalMentalHealth,
    TimeDate,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 22] = [
        Category::NatureGeography,
        Category::PlantResearch,
        Category::AnimalProtection,
        Category::SpaceExploration,
        Category::SchoolEducation,
        Category::TechnologyInvention,
        Category::CultureHistory,
        Category::LanguageEvolution,
        Category::EntertainmentSports,
        Category::ObjectsMaterials,
        Category::FashionTrends,
        Category::DietHealth,
        Category::ArchitecturePlaces,
        Category::TransportationTravel,
        Category::NationalGovernment,
        Category::SocietyEconomy,
        Category::LawsRegulations,
        Category::BattlefieldContention,
        Category::SocialRoles,
        Category::BehaviorActions,
        Category::PhysicalMentalHealth,
        Category::TimeDate,
    ];

    /// Wire identifier, matching the serde representation
    pub fn name(self) -> &'static str {
        match self {
            Category::NatureGeography => "nature_geography",
            Category::PlantResearch => "plant_research",
            Category::AnimalProtection => "animal_protection",
            Category::SpaceExploration => "space_exploration",
            Category::SchoolEducation => "school_education",
            Category::TechnologyInvention => "technology_invention",
            Category::CultureHistory => "culture_history",
            Category::LanguageEvolution => "language_evolution",
            Category::EntertainmentSports => "entertainment_sports",
            Category::ObjectsMaterials => "objects_materials",
            Category::FashionTrends => "fashion_trends",
            Category::DietHealth => "diet_health",
            Category::ArchitecturePlaces => "architecture_places",
            Category::TransportationTravel => "transportation_travel",
            Category::NationalGovernment => "national_government",
            Category::SocietyEconomy => "society_economy",
            Category::LawsRegulations => "laws_regulations",
            Category::BattlefieldContention => "battlefield_contention",
            Category::SocialRoles => "social_roles",
            Category::BehaviorActions => "behavior_actions",
            Category::PhysicalMentalHealth => "physical_mental_health",
            Category::TimeDate => "time_date",
        }
    }

    /// Human-readable display label
    pub fn label(self) -> &'static str {
        match self {
            Category::NatureGeography => "Nature & Geography",
            Category::PlantResearch => "Plant Research",
            Category::AnimalProtection => "Animal Protection",
            Category::SpaceExploration => "Space Exploration",
            Category::SchoolEducation => "School & Education",
            Category::TechnologyInvention => "Technology & Invention",
            Category::CultureHistory => "Culture & History",
            Category::LanguageEvolution => "Language Evolution",
            Category::EntertainmentSports => "Entertainment & Sports",
            Category::ObjectsMaterials => "Objects & Materials",
            Category::FashionTrends => "Fashion Trends",
            Category::DietHealth => "Diet & Health",
            Category::ArchitecturePlaces => "Architecture & Places",
            Category::TransportationTravel => "Transportation & Travel",
            Category::NationalGovernment => "National Government",
            Category::SocietyEconomy => "Society & Economy",
            Category::LawsRegulations => "Laws & Regulations",
            Category::BattlefieldContention => "Battlefield & Contention",
            Category::SocialRoles => "Social Roles",
            Category::BehaviorActions => "Behavior & Actions",
            Category::PhysicalMentalHealth => "Physical & Mental Health",
            Category::TimeDate => "Time & Date",
        }
    }

    /// URL slug used by the site's category pages
    pub fn slug(self) -> &'static str {
        match self {
            Category::NatureGeography => "nature-geography",
            Category::PlantResearch => "plant-research",
            Category::AnimalProtection => "animal-protection",
            Category::SpaceExploration => "space-exploration",
            Category::SchoolEducation => "school-education",
            Category::TechnologyInvention => "technology-invention",
            Category::CultureHistory => "culture-history",
            Category::LanguageEvolution => "language-evolution",
            Category::EntertainmentSports => "entertainment-sports",
            Category::ObjectsMaterials => "objects-materials",
            Category::FashionTrends => "fashion-trends",
            Category::DietHealth => "diet-health",
            Category::ArchitecturePlaces => "architecture-places",
            Category::TransportationTravel => "transportation-travel",
            Category::NationalGovernment => "national-government",
            Category::SocietyEconomy => "society-economy",
            Category::LawsRegulations => "laws-regulations",
            Category::BattlefieldContention => "battlefield-contention",
            Category::SocialRoles => "social-roles",
            Category::BehaviorActions => "behavior-actions",
            Category::PhysicalMentalHealth => "physical-mental-health",
            Category::TimeDate => "time-date",
        }
    }

    /// Parse a wire identifier against the closed set
    ///
    /// Returns None for anything outside the enumeration; callers reject the
    /// request rather than coercing the value.
    pub fn parse(name: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.name() == name)
    }
}

/// Category shape returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub name: &'static str,
    pub label: &'static str,
    pub slug: &'static str,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        CategoryView {
            name: category.name(),
            label: category.label(),
            slug: category.slug(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_identifier() {
        assert_eq!(
            Category::parse("nature_geography"),
            Some(Category::NatureGeography)
        );
        assert_eq!(Category::parse("time_date"), Some(Category::TimeDate));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(Category::parse("not-a-real-category"), None);
        assert_eq!(Category::parse(""), None);
        // Slugs and labels are not wire identifiers
        assert_eq!(Category::parse("nature-geography"), None);
        assert_eq!(Category::parse("Nature & Geography"), None);
    }

    #[test]
    fn test_all_identifiers_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.name()), Some(category));
        }
    }

    #[test]
    fn test_serde_identifier_matches_name() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.name()));
        }
    }

    #[test]
    fn test_mapping_tables_are_distinct() {
        for category in Category::ALL {
            assert_ne!(category.name(), category.slug());
            assert!(!category.label().is_empty());
        }
    }
}
