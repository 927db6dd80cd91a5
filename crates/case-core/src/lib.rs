#![deny(warnings)]

//! Core catalog models and invariants for the case calculator.
//!
//! This crate defines the serializable containers ("cases") and reward
//! definitions consumed by the valuation engine, together with validation
//! helpers and the read-only catalog lookup the engine depends on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Unique identifier for a container, e.g. "starter-case".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub String);

/// Identifier of a reward, unique within its container.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RewardId(pub String);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for RewardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Currency a container is priced in.
///
/// `time` is the unit of account itself. `cooldown` is linear as well but
/// its cost reads as elapsed real time rather than value. Any other name is a
/// tiered currency whose per-unit value is resolved from a tier table.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    /// Base value currency, 1 unit = 1 base value.
    Time,
    /// Free containers gated by a cooldown.
    Cooldown,
    /// Named volume-priced currency, e.g. "diamonds".
    Tiered(String),
}

impl Currency {
    /// Whether cost in this currency is simply `price * quantity`.
    pub fn is_linear(&self) -> bool {
        matches!(self, Currency::Time | Currency::Cooldown)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Currency::Time => "time",
            Currency::Cooldown => "cooldown",
            Currency::Tiered(name) => name,
        }
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "time" => Currency::Time,
            "cooldown" => Currency::Cooldown,
            _ => Currency::Tiered(name),
        }
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Currency::from(s.to_string())
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a reward as stored in the catalog.
///
/// Catalog authors write either a number or free text ("8T-10T",
/// "O/C[300T-390T]", "1.5B"); interpretation is left to the value parser.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

/// Free-form metadata carried for display only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardMeta {
    /// Stats text shown next to the reward.
    pub stats: Option<String>,
    /// How many copies exist in the game.
    pub exist_count: Option<u64>,
    /// Last time the value was revised.
    pub last_updated: Option<NaiveDate>,
}

/// A single entry of a container's reward table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RewardDefinition {
    /// Identifier, unique within the container.
    pub id: RewardId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Textual or numeric value estimate.
    #[serde(default)]
    pub value: RawValue,
    /// Relative drop weight (>= 0). Weights need not sum to 100.
    pub weight: f64,
    /// Rarity or category tag.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub meta: RewardMeta,
}

/// A purchasable container with a weighted reward table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,
    #[serde(default)]
    pub name: String,
    /// Price per opening (>= 0) in `currency`.
    pub price: f64,
    pub currency: Currency,
    /// Rewards in display order. Order carries no sampling meaning.
    pub rewards: Vec<RewardDefinition>,
}

impl Container {
    /// Sum of all reward weights.
    pub fn total_weight(&self) -> f64 {
        self.rewards.iter().map(|r| r.weight).sum()
    }

    /// Looks up a reward by id.
    pub fn reward(&self, id: &RewardId) -> Option<&RewardDefinition> {
        self.rewards.iter().find(|r| &r.id == id)
    }
}

/// Validation errors for catalog invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Identifiers must not be blank.
    #[error("identifier must not be empty")]
    EmptyId,
    /// Price must be finite and non-negative.
    #[error("container {0}: price must be finite and >= 0")]
    InvalidPrice(String),
    /// Weight must be finite and non-negative.
    #[error("reward {0}: weight must be finite and >= 0")]
    InvalidWeight(String),
    /// Reward ids must be unique within a container.
    #[error("container {container}: duplicate reward id {reward}")]
    DuplicateReward { container: String, reward: String },
    /// Container ids must be unique within a catalog.
    #[error("duplicate container id {0}")]
    DuplicateContainer(String),
}

/// Validate a single reward definition.
pub fn validate_reward(r: &RewardDefinition) -> Result<(), ValidationError> {
    if r.id.0.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }
    if !r.weight.is_finite() || r.weight < 0.0 {
        return Err(ValidationError::InvalidWeight(r.id.0.clone()));
    }
    Ok(())
}

/// Validate a container and all of its rewards.
///
/// An empty reward list is accepted here: the catalog may list containers
/// that are not yet sampleable. The sampler rejects them separately.
pub fn validate_container(c: &Container) -> Result<(), ValidationError> {
    if c.id.0.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }
    if !c.price.is_finite() || c.price < 0.0 {
        return Err(ValidationError::InvalidPrice(c.id.0.clone()));
    }
    let mut seen: BTreeSet<&RewardId> = BTreeSet::new();
    for r in &c.rewards {
        validate_reward(r)?;
        if !seen.insert(&r.id) {
            return Err(ValidationError::DuplicateReward {
                container: c.id.0.clone(),
                reward: r.id.0.clone(),
            });
        }
    }
    Ok(())
}

/// Read-only source of container definitions.
pub trait CatalogProvider {
    /// Returns the container with `id`, or `None` when unknown.
    fn get_container(&self, id: &ContainerId) -> Option<&Container>;
}

/// Errors raised while loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid yaml catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// On-disk catalog layout.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub containers: Vec<Container>,
}

/// Validated in-memory catalog keyed by container id.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    containers: BTreeMap<ContainerId, Container>,
}

impl InMemoryCatalog {
    /// Build a catalog, validating every container and rejecting duplicate ids.
    pub fn new(containers: Vec<Container>) -> Result<Self, ValidationError> {
        let mut map = BTreeMap::new();
        for c in containers {
            validate_container(&c)?;
            if map.contains_key(&c.id) {
                return Err(ValidationError::DuplicateContainer(c.id.0.clone()));
            }
            map.insert(c.id.clone(), c);
        }
        Ok(Self { containers: map })
    }

    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(text)?;
        Ok(Self::new(file.containers)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(text)?;
        Ok(Self::new(file.containers)?)
    }

    /// Load a catalog file; `.yaml`/`.yml` are read as YAML, anything else as JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let catalog = if is_yaml {
            Self::from_yaml_str(&text)?
        } else {
            Self::from_json_str(&text)?
        };
        debug!(path = %path.display(), containers = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Containers in id order.
    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.values()
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn get_container(&self, id: &ContainerId) -> Option<&Container> {
        self.containers.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reward(id: &str, weight: f64) -> RewardDefinition {
        RewardDefinition {
            id: RewardId(id.to_string()),
            name: id.to_uppercase(),
            value: RawValue::Number(10.0),
            weight,
            category: "common".to_string(),
            meta: RewardMeta::default(),
        }
    }

    fn container(id: &str, rewards: Vec<RewardDefinition>) -> Container {
        Container {
            id: ContainerId(id.to_string()),
            name: "Case".to_string(),
            price: 200.0,
            currency: Currency::Time,
            rewards,
        }
    }

    #[test]
    fn currency_names_parse() {
        assert_eq!(Currency::from("time"), Currency::Time);
        assert_eq!(Currency::from(" Cooldown "), Currency::Cooldown);
        assert_eq!(
            Currency::from("Diamonds"),
            Currency::Tiered("diamonds".to_string())
        );
        assert!(Currency::Cooldown.is_linear());
        assert!(!Currency::from("diamonds").is_linear());
    }

    #[test]
    fn container_json_roundtrip() {
        let text = r#"{
            "id": "starter",
            "price": 10,
            "currency": "diamonds",
            "rewards": [
                {"id": "a", "name": "Blade", "value": "8T-10T", "weight": 40,
                 "meta": {"exist_count": 12, "last_updated": "2024-03-01"}},
                {"id": "b", "value": 50, "weight": 60},
                {"id": "c", "value": null, "weight": 0}
            ]
        }"#;
        let c: Container = serde_json::from_str(text).unwrap();
        assert_eq!(c.currency, Currency::Tiered("diamonds".to_string()));
        assert_eq!(c.rewards[0].value, RawValue::Text("8T-10T".to_string()));
        assert_eq!(c.rewards[1].value, RawValue::Number(50.0));
        assert_eq!(c.rewards[2].value, RawValue::Missing);
        assert_eq!(c.rewards[0].meta.exist_count, Some(12));
        assert_eq!(
            c.rewards[0].meta.last_updated,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(c.total_weight(), 100.0);

        let s = serde_json::to_string(&c).unwrap();
        let back: Container = serde_json::from_str(&s).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn missing_value_defaults() {
        let r: RewardDefinition = serde_json::from_str(r#"{"id":"x","weight":1}"#).unwrap();
        assert_eq!(r.value, RawValue::Missing);
        assert!(r.meta.stats.is_none());
    }

    #[test]
    fn validation_rejects_bad_data() {
        let c = container("c", vec![reward("a", -1.0)]);
        assert_eq!(
            validate_container(&c),
            Err(ValidationError::InvalidWeight("a".to_string()))
        );

        let c = container("c", vec![reward("a", f64::NAN)]);
        assert!(validate_container(&c).is_err());

        let mut c = container("c", vec![reward("a", 1.0)]);
        c.price = -5.0;
        assert_eq!(
            validate_container(&c),
            Err(ValidationError::InvalidPrice("c".to_string()))
        );

        let c = container("c", vec![reward("a", 1.0), reward("a", 2.0)]);
        assert!(matches!(
            validate_container(&c),
            Err(ValidationError::DuplicateReward { .. })
        ));

        let c = container(" ", vec![]);
        assert_eq!(validate_container(&c), Err(ValidationError::EmptyId));
    }

    #[test]
    fn catalog_lookup_and_duplicates() {
        let cat = InMemoryCatalog::new(vec![
            container("one", vec![reward("a", 1.0)]),
            container("two", vec![]),
        ])
        .unwrap();
        assert_eq!(cat.len(), 2);
        assert!(cat.get_container(&ContainerId("one".into())).is_some());
        assert!(cat.get_container(&ContainerId("nope".into())).is_none());

        let dup = InMemoryCatalog::new(vec![container("x", vec![]), container("x", vec![])]);
        assert_eq!(
            dup.err(),
            Some(ValidationError::DuplicateContainer("x".to_string()))
        );
    }

    #[test]
    fn yaml_catalog_loads() {
        let text = r#"
containers:
  - id: free
    price: 0
    currency: cooldown
    rewards:
      - id: coin
        value: 1.5K
        weight: 99
      - id: crown
        value: O/C
        weight: 1
"#;
        let cat = InMemoryCatalog::from_yaml_str(text).unwrap();
        let c = cat.get_container(&ContainerId("free".into())).unwrap();
        assert_eq!(c.currency, Currency::Cooldown);
        assert_eq!(c.rewards[0].value, RawValue::Text("1.5K".to_string()));
        assert!(c.reward(&RewardId("crown".into())).is_some());
    }

    #[test]
    fn invalid_catalog_surfaces_validation_error() {
        let text = r#"{"containers":[{"id":"c","price":1,"currency":"time",
            "rewards":[{"id":"a","weight":-2}]}]}"#;
        let err = InMemoryCatalog::from_json_str(text).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    proptest! {
        #[test]
        fn non_negative_weights_validate(weights in proptest::collection::vec(0.0f64..1_000.0, 1..20),
                                         price in 0.0f64..1e12) {
            let rewards = weights
                .iter()
                .enumerate()
                .map(|(i, w)| reward(&format!("r{i}"), *w))
                .collect();
            let mut c = container("p", rewards);
            c.price = price;
            prop_assert!(validate_container(&c).is_ok());
        }
    }
}
