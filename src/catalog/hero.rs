//! Hero identities and base stats.
//!
//! ## HeroKind
//!
//! The closed set of heroes. Every ability and passive dispatches on this
//! enum, never on a display string.
//!
//! ## HeroCatalog
//!
//! Base stat table keyed by `HeroKind`. Reads return owned copies so callers
//! can never mutate catalog data through a fielded unit.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{ArenaError, Result};

/// One of the eight playable heroes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroKind {
    Dolia,
    Lan,
    GongsunLi,
    SunShangxiang,
    Yao,
    DaQiao,
    ShaoSiyuan,
    YangYuhuan,
}

impl HeroKind {
    /// All heroes in catalog order.
    pub const ALL: [HeroKind; 8] = [
        HeroKind::Dolia,
        HeroKind::Lan,
        HeroKind::GongsunLi,
        HeroKind::SunShangxiang,
        HeroKind::Yao,
        HeroKind::DaQiao,
        HeroKind::ShaoSiyuan,
        HeroKind::YangYuhuan,
    ];

    /// Stable catalog id used by the data tables.
    #[must_use]
    pub const fn catalog_id(self) -> &'static str {
        match self {
            HeroKind::Dolia => "duoliya_001",
            HeroKind::Lan => "lan_002",
            HeroKind::GongsunLi => "gongsunli_003",
            HeroKind::SunShangxiang => "sunshangxiang_004",
            HeroKind::Yao => "yao_005",
            HeroKind::DaQiao => "daqiao_006",
            HeroKind::ShaoSiyuan => "shaosiyuan_007",
            HeroKind::YangYuhuan => "yangyuhuan_008",
        }
    }

    #[must_use]
    pub fn from_catalog_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.catalog_id() == id)
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            HeroKind::Dolia => "Dolia",
            HeroKind::Lan => "Lan",
            HeroKind::GongsunLi => "Gongsun Li",
            HeroKind::SunShangxiang => "Sun Shangxiang",
            HeroKind::Yao => "Yao",
            HeroKind::DaQiao => "Da Qiao",
            HeroKind::ShaoSiyuan => "Shao Siyuan",
            HeroKind::YangYuhuan => "Yang Yuhuan",
        }
    }
}

impl std::fmt::Display for HeroKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

fn default_crit_damage() -> f64 {
    1.3
}

fn default_skill_cost() -> u32 {
    2
}

/// Base stats for one hero.
///
/// Optional fields default the way loose catalog data expects: no crit
/// chance, a 1.3 crit multiplier, no dodge, and an ability cost of 2.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeroDefinition {
    pub kind: HeroKind,
    pub name: String,
    pub max_health: i64,
    pub attack: i64,
    pub armor: i64,
    #[serde(default)]
    pub crit_rate: f64,
    #[serde(default = "default_crit_damage")]
    pub crit_damage: f64,
    #[serde(default)]
    pub dodge_rate: f64,
    #[serde(default = "default_skill_cost")]
    pub skill_cost: u32,
    /// Using the ability ends the owner's turn.
    #[serde(default)]
    pub skill_ends_turn: bool,
}

impl HeroDefinition {
    /// Create a definition with default crit, dodge and ability cost.
    pub fn new(kind: HeroKind, max_health: i64, attack: i64, armor: i64) -> Self {
        Self {
            kind,
            name: kind.display_name().to_string(),
            max_health,
            attack,
            armor,
            crit_rate: 0.0,
            crit_damage: default_crit_damage(),
            dodge_rate: 0.0,
            skill_cost: default_skill_cost(),
            skill_ends_turn: false,
        }
    }

    #[must_use]
    pub fn with_crit(mut self, rate: f64, damage: f64) -> Self {
        self.crit_rate = rate;
        self.crit_damage = damage;
        self
    }

    #[must_use]
    pub fn with_dodge(mut self, rate: f64) -> Self {
        self.dodge_rate = rate;
        self
    }

    #[must_use]
    pub fn with_skill(mut self, cost: u32, ends_turn: bool) -> Self {
        self.skill_cost = cost;
        self.skill_ends_turn = ends_turn;
        self
    }
}

/// Hero base stat table.
#[derive(Clone, Debug, Default)]
pub struct HeroCatalog {
    heroes: FxHashMap<HeroKind, HeroDefinition>,
}

impl HeroCatalog {
    /// Empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped hero table.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        let heroes = [
            HeroDefinition::new(HeroKind::Dolia, 900, 330, 325)
                .with_crit(0.05, 1.3)
                .with_skill(1, false),
            HeroDefinition::new(HeroKind::Lan, 700, 400, 250)
                .with_crit(0.10, 1.3)
                .with_skill(2, false),
            HeroDefinition::new(HeroKind::GongsunLi, 600, 575, 150)
                .with_crit(0.20, 1.3)
                .with_dodge(0.25)
                .with_skill(3, false),
            HeroDefinition::new(HeroKind::SunShangxiang, 625, 550, 175)
                .with_crit(0.15, 1.3)
                .with_skill(2, true),
            HeroDefinition::new(HeroKind::Yao, 850, 280, 200)
                .with_crit(0.0, 1.3)
                .with_skill(2, true),
            HeroDefinition::new(HeroKind::DaQiao, 800, 300, 150)
                .with_crit(0.10, 1.3)
                .with_skill(4, true),
            HeroDefinition::new(HeroKind::ShaoSiyuan, 750, 350, 225)
                .with_crit(0.10, 1.3)
                .with_skill(2, false),
            HeroDefinition::new(HeroKind::YangYuhuan, 700, 400, 150)
                .with_crit(0.15, 1.3)
                .with_skill(2, true),
        ];
        for hero in heroes {
            catalog.insert(hero);
        }
        catalog
    }

    /// Parse a JSON array of hero definitions.
    ///
    /// ```
    /// use hero_duel::catalog::{HeroCatalog, HeroKind};
    ///
    /// let json = r#"[{ "kind": "lan", "name": "Lan", "max_health": 700, "attack": 400, "armor": 250 }]"#;
    /// let catalog = HeroCatalog::from_json(json).unwrap();
    /// let lan = catalog.get(HeroKind::Lan).unwrap();
    /// assert_eq!(lan.crit_rate, 0.0);
    /// assert_eq!(lan.crit_damage, 1.3);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let definitions: Vec<HeroDefinition> =
            serde_json::from_str(json).map_err(|e| ArenaError::CatalogFormat(e.to_string()))?;
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.insert(definition);
        }
        Ok(catalog)
    }

    /// Add or replace a definition.
    pub fn insert(&mut self, definition: HeroDefinition) {
        self.heroes.insert(definition.kind, definition);
    }

    /// Copy of a hero's base stats.
    pub fn get(&self, kind: HeroKind) -> Result<HeroDefinition> {
        self.heroes
            .get(&kind)
            .cloned()
            .ok_or_else(|| ArenaError::HeroNotFound(kind.catalog_id().to_string()))
    }

    #[must_use]
    pub fn contains(&self, kind: HeroKind) -> bool {
        self.heroes.contains_key(&kind)
    }

    /// Heroes present in the catalog, in catalog order.
    #[must_use]
    pub fn kinds(&self) -> Vec<HeroKind> {
        let mut kinds: Vec<_> = self.heroes.keys().copied().collect();
        kinds.sort();
        kinds
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_every_hero() {
        let catalog = HeroCatalog::builtin();
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.kinds(), HeroKind::ALL.to_vec());
    }

    #[test]
    fn test_builtin_stats() {
        let catalog = HeroCatalog::builtin();

        let gongsun = catalog.get(HeroKind::GongsunLi).unwrap();
        assert_eq!(gongsun.max_health, 600);
        assert_eq!(gongsun.attack, 575);
        assert_eq!(gongsun.dodge_rate, 0.25);
        assert_eq!(gongsun.skill_cost, 3);

        let daqiao = catalog.get(HeroKind::DaQiao).unwrap();
        assert_eq!(daqiao.skill_cost, 4);
        assert!(daqiao.skill_ends_turn);

        assert_eq!(catalog.get(HeroKind::Dolia).unwrap().skill_cost, 1);
    }

    #[test]
    fn test_reads_are_copies() {
        let catalog = HeroCatalog::builtin();
        let mut lan = catalog.get(HeroKind::Lan).unwrap();
        lan.attack = 9999;
        assert_eq!(catalog.get(HeroKind::Lan).unwrap().attack, 400);
    }

    #[test]
    fn test_missing_hero() {
        let catalog = HeroCatalog::new();
        let err = catalog.get(HeroKind::Yao).unwrap_err();
        assert_eq!(err, ArenaError::HeroNotFound("yao_005".into()));
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"[
            { "kind": "yao", "name": "Yao", "max_health": 850, "attack": 280, "armor": 200 },
            { "kind": "da_qiao", "name": "Da Qiao", "max_health": 800, "attack": 300, "armor": 150,
              "crit_rate": 0.1, "skill_cost": 4, "skill_ends_turn": true }
        ]"#;
        let catalog = HeroCatalog::from_json(json).unwrap();

        let yao = catalog.get(HeroKind::Yao).unwrap();
        assert_eq!(yao.crit_rate, 0.0);
        assert_eq!(yao.crit_damage, 1.3);
        assert_eq!(yao.skill_cost, 2);
        assert!(!yao.skill_ends_turn);

        let daqiao = catalog.get(HeroKind::DaQiao).unwrap();
        assert_eq!(daqiao.skill_cost, 4);
        assert!(daqiao.skill_ends_turn);
    }

    #[test]
    fn test_json_rejects_garbage() {
        let err = HeroCatalog::from_json("{ not json").unwrap_err();
        assert_eq!(err.code(), "catalog_format");
    }

    #[test]
    fn test_catalog_id_round_trip() {
        for kind in HeroKind::ALL {
            assert_eq!(HeroKind::from_catalog_id(kind.catalog_id()), Some(kind));
        }
        assert_eq!(HeroKind::from_catalog_id("unknown"), None);
    }
}
