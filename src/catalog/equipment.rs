//! Equipment definitions.
//!
//! ## Effect classes
//!
//! - **Static** (`attack`, `max_health`, `armor`, `crit_rate`, `crit_damage`,
//!   `dodge_rate`): applied once at equip time and reversed when the item is
//!   consumed by crafting.
//! - **Combat-time** (`damage_amplify`, `heal_per_turn`): read during attack
//!   resolution and at turn start.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ArenaError, RandomSource, Result};

/// Item tier. Only basic and advanced items exist today.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Basic,
    Advanced,
    Epic,
    Legendary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Attack,
    Defense,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Attack,
    MaxHealth,
    Armor,
    CritRate,
    CritDamage,
    DodgeRate,
    DamageAmplify,
    HealPerTurn,
}

impl EffectKind {
    /// Static effects change unit stats at equip time.
    #[must_use]
    pub const fn is_static(self) -> bool {
        !matches!(self, EffectKind::DamageAmplify | EffectKind::HealPerTurn)
    }
}

/// One `(kind, magnitude)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemEffect {
    #[serde(rename = "type")]
    pub kind: EffectKind,
    pub value: f64,
}

impl ItemEffect {
    #[must_use]
    pub const fn new(kind: EffectKind, value: f64) -> Self {
        Self { kind, value }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub category: Category,
    pub effects: SmallVec<[ItemEffect; 2]>,
}

impl EquipmentItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        tier: Tier,
        category: Category,
        effects: impl IntoIterator<Item = ItemEffect>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier,
            category,
            effects: effects.into_iter().collect(),
        }
    }

    /// Sum of all effects of one kind.
    #[must_use]
    pub fn total(&self, kind: EffectKind) -> f64 {
        self.effects
            .iter()
            .filter(|effect| effect.kind == kind)
            .map(|effect| effect.value)
            .sum()
    }

    pub fn static_effects(&self) -> impl Iterator<Item = &ItemEffect> {
        self.effects.iter().filter(|effect| effect.kind.is_static())
    }
}

fn basic(id: &str, name: &str, category: Category, kind: EffectKind, value: f64) -> EquipmentItem {
    EquipmentItem::new(id, name, Tier::Basic, category, [ItemEffect::new(kind, value)])
}

/// Basic item table, the pool for equipment purchases.
#[derive(Clone, Debug, Default)]
pub struct EquipmentCatalog {
    items: FxHashMap<String, EquipmentItem>,
    order: Vec<String>,
}

impl EquipmentCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped basic items.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        let items = [
            basic("basic_001", "Iron Sword", Category::Attack, EffectKind::Attack, 20.0),
            basic("basic_002", "Gauntlets", Category::Attack, EffectKind::CritRate, 0.10),
            basic("basic_003", "Thunder Blade", Category::Attack, EffectKind::CritDamage, 0.05),
            basic("basic_004", "Dagger", Category::Attack, EffectKind::DamageAmplify, 0.03),
            basic("basic_005", "Red Agate", Category::Defense, EffectKind::MaxHealth, 200.0),
            basic("basic_006", "Cloth Armor", Category::Defense, EffectKind::Armor, 30.0),
            basic("basic_007", "Vitality Crystal", Category::Defense, EffectKind::HealPerTurn, 30.0),
        ];
        for item in items {
            catalog.insert(item);
        }
        catalog
    }

    /// Add or replace an item. Insertion order is the draw order.
    pub fn insert(&mut self, item: EquipmentItem) {
        if !self.items.contains_key(&item.id) {
            self.order.push(item.id.clone());
        }
        self.items.insert(item.id.clone(), item);
    }

    /// Copy of an item definition.
    pub fn get(&self, id: &str) -> Result<EquipmentItem> {
        self.items
            .get(id)
            .cloned()
            .ok_or_else(|| ArenaError::EquipmentNotFound(id.to_string()))
    }

    /// Copies of every basic item in insertion order.
    #[must_use]
    pub fn basic_items(&self) -> Vec<EquipmentItem> {
        self.order
            .iter()
            .filter_map(|id| self.items.get(id))
            .filter(|item| item.tier == Tier::Basic)
            .cloned()
            .collect()
    }

    /// Draw `count` distinct basic items.
    ///
    /// Partial Fisher-Yates over the basic pool; returns fewer items only if
    /// the pool is smaller than `count`.
    pub fn draw_basic(&self, rng: &mut impl RandomSource, count: usize) -> Vec<EquipmentItem> {
        let mut pool = self.basic_items();
        let take = count.min(pool.len());
        for i in 0..take {
            let j = i + rng.next_index(pool.len() - i);
            pool.swap(i, j);
        }
        pool.truncate(take);
        pool
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
