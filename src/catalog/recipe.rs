//! Crafting recipes: two basic materials plus gold make one advanced item.
//!
//! Material pairs are unordered. `find("basic_004", "basic_002")` and
//! `find("basic_002", "basic_004")` return the same recipe.

use serde::{Deserialize, Serialize};

use super::equipment::{Category, EffectKind, EquipmentItem, ItemEffect, Tier};
use crate::core::{ArenaError, Result};

/// Gold cost of every shipped recipe.
pub const DEFAULT_CRAFT_COST: i64 = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub materials: [String; 2],
    pub cost: i64,
    pub result: EquipmentItem,
}

impl Recipe {
    /// Whether the pair matches as a set.
    #[must_use]
    pub fn matches(&self, first: &str, second: &str) -> bool {
        let [a, b] = &self.materials;
        (a == first && b == second) || (a == second && b == first)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

fn advanced(
    id: &str,
    name: &str,
    materials: [&str; 2],
    category: Category,
    effects: &[(EffectKind, f64)],
) -> Recipe {
    Recipe {
        id: id.to_string(),
        materials: materials.map(|m| m.to_string()),
        cost: DEFAULT_CRAFT_COST,
        result: EquipmentItem::new(
            id,
            name,
            Tier::Advanced,
            category,
            effects.iter().map(|&(kind, value)| ItemEffect::new(kind, value)),
        ),
    }
}

impl RecipeBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped recipes.
    #[must_use]
    pub fn builtin() -> Self {
        use Category::{Attack, Defense};
        use EffectKind as E;

        let mut book = Self::new();
        let recipes = [
            advanced("adv_001", "Great Sword", ["basic_001", "basic_001"], Attack, &[(E::Attack, 50.0)]),
            advanced(
                "adv_002",
                "Storm Gauntlets",
                ["basic_002", "basic_004"],
                Attack,
                &[(E::CritRate, 0.15), (E::DamageAmplify, 0.05)],
            ),
            advanced(
                "adv_003",
                "Serrated Blade",
                ["basic_001", "basic_004"],
                Attack,
                &[(E::Attack, 25.0), (E::DamageAmplify, 0.07)],
            ),
            advanced(
                "adv_004",
                "Lightning Fist",
                ["basic_002", "basic_003"],
                Attack,
                &[(E::CritRate, 0.13), (E::CritDamage, 0.10)],
            ),
            advanced(
                "adv_005",
                "Blood Blade",
                ["basic_005", "basic_001"],
                Attack,
                &[(E::Attack, 25.0), (E::MaxHealth, 250.0)],
            ),
            advanced("adv_006", "Giant's Heart", ["basic_005", "basic_005"], Defense, &[(E::MaxHealth, 500.0)]),
            advanced(
                "adv_007",
                "Spiked Mail",
                ["basic_001", "basic_006"],
                Defense,
                &[(E::Attack, 25.0), (E::Armor, 40.0)],
            ),
            advanced(
                "adv_008",
                "Guardian Plate",
                ["basic_005", "basic_006"],
                Defense,
                &[(E::MaxHealth, 300.0), (E::Armor, 40.0)],
            ),
            advanced(
                "adv_009",
                "Spring Amulet",
                ["basic_007", "basic_005"],
                Defense,
                &[(E::HealPerTurn, 50.0), (E::MaxHealth, 400.0)],
            ),
        ];
        for recipe in recipes {
            book.insert(recipe);
        }
        book
    }

    /// Add a recipe, replacing any existing one for the same material pair.
    pub fn insert(&mut self, recipe: Recipe) {
        let [a, b] = &recipe.materials;
        self.recipes.retain(|existing| !existing.matches(a, b));
        self.recipes.push(recipe);
    }

    /// Copy of the recipe combining the two materials, in either order.
    pub fn find(&self, first: &str, second: &str) -> Result<Recipe> {
        self.recipes
            .iter()
            .find(|recipe| recipe.matches(first, second))
            .cloned()
            .ok_or_else(|| ArenaError::RecipeNotFound {
                first: first.to_string(),
                second: second.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_count() {
        let book = RecipeBook::builtin();
        assert_eq!(book.len(), 9);
        assert!(book.iter().all(|recipe| recipe.cost == DEFAULT_CRAFT_COST));
        assert!(book.iter().all(|recipe| recipe.result.tier == Tier::Advanced));
    }

    #[test]
    fn test_lookup_is_order_independent() {
        let book = RecipeBook::builtin();
        let forward = book.find("basic_002", "basic_004").unwrap();
        let reverse = book.find("basic_004", "basic_002").unwrap();
        assert_eq!(forward, reverse);
        assert_eq!(forward.id, "adv_002");
    }

    #[test]
    fn test_same_material_pair() {
        let book = RecipeBook::builtin();
        let recipe = book.find("basic_005", "basic_005").unwrap();
        assert_eq!(recipe.result.total(EffectKind::MaxHealth), 500.0);
    }

    #[test]
    fn test_unknown_pair() {
        let book = RecipeBook::builtin();
        let err = book.find("basic_003", "basic_007").unwrap_err();
        assert_eq!(err.code(), "recipe_not_found");
    }

    #[test]
    fn test_insert_replaces_pair() {
        let mut book = RecipeBook::builtin();
        let mut replacement = book.find("basic_001", "basic_001").unwrap();
        replacement.cost = 99;
        book.insert(replacement);
        assert_eq!(book.len(), 9);
        assert_eq!(book.find("basic_001", "basic_001").unwrap().cost, 99);
    }
}
