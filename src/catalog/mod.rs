//! Static catalogs: hero base stats, basic equipment, crafting recipes.
//!
//! Catalogs are immutable once a match starts and are shared between rooms
//! behind an `Arc`. Every read hands back an owned copy.

pub mod hero;
pub mod equipment;
pub mod recipe;

pub use hero::{HeroCatalog, HeroDefinition, HeroKind};
pub use equipment::{Category, EffectKind, EquipmentCatalog, EquipmentItem, ItemEffect, Tier};
pub use recipe::{Recipe, RecipeBook, DEFAULT_CRAFT_COST};

/// All static tables a session reads from.
#[derive(Clone, Debug, Default)]
pub struct Catalogs {
    pub heroes: HeroCatalog,
    pub equipment: EquipmentCatalog,
    pub recipes: RecipeBook,
}

impl Catalogs {
    #[must_use]
    pub fn new(heroes: HeroCatalog, equipment: EquipmentCatalog, recipes: RecipeBook) -> Self {
        Self {
            heroes,
            equipment,
            recipes,
        }
    }

    /// The shipped hero, equipment and recipe tables.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(HeroCatalog::builtin(), EquipmentCatalog::builtin(), RecipeBook::builtin())
    }
}
