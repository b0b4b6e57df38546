use std::fmt;
use std::str::FromStr;

/// Kinds of damage a card can deal; combatants resist or suffer them per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DamageType {
    Physical,
    Fire,
    Frost,
    Lightning,
    Poison,
    Holy,
}

impl DamageType {
    pub const ALL: [DamageType; 6] = [
        DamageType::Physical,
        DamageType::Fire,
        DamageType::Frost,
        DamageType::Lightning,
        DamageType::Poison,
        DamageType::Holy,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            DamageType::Physical => "physical",
            DamageType::Fire => "fire",
            DamageType::Frost => "frost",
            DamageType::Lightning => "lightning",
            DamageType::Poison => "poison",
            DamageType::Holy => "holy",
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DamageTypeParseError {
    #[error("invalid damage type: '{0}'")]
    Invalid(String),
}

impl FromStr for DamageType {
    type Err = DamageTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        DamageType::ALL
            .into_iter()
            .find(|d| d.label() == t)
            .ok_or_else(|| DamageTypeParseError::Invalid(s.to_string()))
    }
}

/// How many targets a card needs before it resolves.
///
/// Completion is decided by [`crate::targeting::is_complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetRequirement {
    /// Affects the player only.
    SelfOnly,
    /// Exactly one enemy.
    Single,
    /// Two enemies, or every remaining one if fewer are left.
    TwoOrAll,
    /// Three enemies, or every remaining one if fewer are left.
    ThreeOrAll,
    /// Up to four enemies.
    UpToFour,
    /// Every enemy.
    All,
}

impl TargetRequirement {
    pub const ALL: [TargetRequirement; 6] = [
        TargetRequirement::SelfOnly,
        TargetRequirement::Single,
        TargetRequirement::TwoOrAll,
        TargetRequirement::ThreeOrAll,
        TargetRequirement::UpToFour,
        TargetRequirement::All,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            TargetRequirement::SelfOnly => "self",
            TargetRequirement::Single => "single",
            TargetRequirement::TwoOrAll => "two",
            TargetRequirement::ThreeOrAll => "three",
            TargetRequirement::UpToFour => "four",
            TargetRequirement::All => "all",
        }
    }
}

impl fmt::Display for TargetRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TargetRequirementParseError {
    #[error("invalid target requirement: '{0}'")]
    Invalid(String),
}

impl FromStr for TargetRequirement {
    type Err = TargetRequirementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        TargetRequirement::ALL
            .into_iter()
            .find(|r| r.label() == t)
            .ok_or_else(|| TargetRequirementParseError::Invalid(s.to_string()))
    }
}

/// Static data of a card: costs, targeting and effect.
///
/// ```
/// use card_combat::cards::{CardData, DamageType, TargetRequirement};
///
/// let strike: CardData = "Strike:1/0:single:physical:6".parse().unwrap();
/// assert_eq!(strike.action_cost, 1);
/// assert_eq!(strike.target, TargetRequirement::Single);
/// assert_eq!(strike.damage_type, DamageType::Physical);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct CardData {
    pub name: String,
    pub action_cost: u32,
    pub movement_cost: u32,
    pub target: TargetRequirement,
    pub damage_type: DamageType,
    pub power: f32,
}

impl CardData {
    pub fn new(
        name: impl Into<String>,
        action_cost: u32,
        movement_cost: u32,
        target: TargetRequirement,
    ) -> Self {
        Self {
            name: name.into(),
            action_cost,
            movement_cost,
            target,
            damage_type: DamageType::Physical,
            power: 0.0,
        }
    }

    pub fn with_damage(mut self, damage_type: DamageType, power: f32) -> Self {
        self.damage_type = damage_type;
        self.power = power;
        self
    }
}

impl fmt::Display for CardData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}/{}:{}:{}:{}",
            self.name, self.action_cost, self.movement_cost, self.target, self.damage_type, self.power
        )
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardParseError {
    #[error("invalid card: '{0}'")]
    Invalid(String),
    #[error("invalid cost '{0}', expected <action>/<movement>")]
    Cost(String),
    #[error("invalid power: '{0}'")]
    Power(String),
    #[error(transparent)]
    Target(#[from] TargetRequirementParseError),
    #[error(transparent)]
    DamageType(#[from] DamageTypeParseError),
}

impl FromStr for CardData {
    type Err = CardParseError;

    /// Format: `name:action/movement:target:damage_type:power`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(':').map(str::trim).collect();
        let [name, cost, target, damage_type, power] = fields.as_slice() else {
            return Err(CardParseError::Invalid(s.to_string()));
        };
        if name.is_empty() {
            return Err(CardParseError::Invalid(s.to_string()));
        }
        let (ap, mp) = cost.split_once('/').ok_or_else(|| CardParseError::Cost(cost.to_string()))?;
        let action_cost = ap.parse::<u32>().map_err(|_| CardParseError::Cost(cost.to_string()))?;
        let movement_cost =
            mp.parse::<u32>().map_err(|_| CardParseError::Cost(cost.to_string()))?;
        let power = power
            .parse::<f32>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| CardParseError::Power(power.to_string()))?;
        Ok(CardData::new(*name, action_cost, movement_cost, target.parse()?)
            .with_damage(damage_type.parse()?, power))
    }
}

/// Parse card definitions separated by newlines or semicolons; blank lines and
/// `#` comments are skipped.
///
/// ```
/// use card_combat::cards::parse_cards;
///
/// let cards = parse_cards("Strike:1/0:single:physical:6; Guard:1/0:self:holy:0").unwrap();
/// assert_eq!(cards.len(), 2);
/// assert_eq!(cards[1].name, "Guard");
/// ```
pub fn parse_cards(input: &str) -> Result<Vec<CardData>, CardParseError> {
    input
        .split(|c: char| c == '\n' || c == ';')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .map(CardData::from_str)
        .collect()
}

/// Identity of a card instance held in a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A card as held in hand: an instance id plus its static data.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    id: CardId,
    data: CardData,
}

impl Card {
    pub fn new(id: CardId, data: CardData) -> Self {
        Self { id, data }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn data(&self) -> &CardData {
        &self.data
    }

    pub fn into_data(self) -> CardData {
        self.data
    }
}

/// Starter deck used by the terminal front end.
pub const STARTER_DECK: &str = "\
Strike:1/0:single:physical:6
Strike:1/0:single:physical:6
Strike:1/0:single:physical:6
Lunge:1/1:single:physical:9
Cleave:2/0:two:physical:5
Chain Lightning:2/0:three:lightning:4
Frost Nova:2/1:all:frost:3
Volley:2/0:four:physical:3
Venom Dart:1/0:single:poison:4
Second Wind:1/0:self:holy:0
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_requirement_display_and_from_str() {
        for r in TargetRequirement::ALL {
            assert_eq!(r.to_string().parse::<TargetRequirement>().unwrap(), r);
        }
        assert_eq!(" ALL ".parse::<TargetRequirement>().unwrap(), TargetRequirement::All);
        assert!("five".parse::<TargetRequirement>().is_err());
    }

    #[test]
    fn damage_type_from_str() {
        assert_eq!("Fire".parse::<DamageType>().unwrap(), DamageType::Fire);
        assert!("acid".parse::<DamageType>().is_err());
    }

    #[test]
    fn card_from_str() {
        let c: CardData = "Cleave: 2/0 : two : physical : 5".parse().unwrap();
        assert_eq!(c.name, "Cleave");
        assert_eq!((c.action_cost, c.movement_cost), (2, 0));
        assert_eq!(c.target, TargetRequirement::TwoOrAll);
        assert_eq!(c.power, 5.0);
        assert_eq!(c.to_string(), "Cleave:2/0:two:physical:5");
    }

    #[test]
    fn card_from_str_rejects_bad_fields() {
        assert!(matches!("Strike".parse::<CardData>(), Err(CardParseError::Invalid(_))));
        assert!(matches!("Strike:1:single:fire:1".parse::<CardData>(), Err(CardParseError::Cost(_))));
        assert!(matches!(
            "Strike:1/-1:single:fire:1".parse::<CardData>(),
            Err(CardParseError::Cost(_))
        ));
        assert!(matches!(
            "Strike:1/0:single:fire:-2".parse::<CardData>(),
            Err(CardParseError::Power(_))
        ));
        assert!(matches!(
            "Strike:1/0:pair:fire:1".parse::<CardData>(),
            Err(CardParseError::Target(_))
        ));
    }

    #[test]
    fn starter_deck_parses() {
        let cards = parse_cards(STARTER_DECK).unwrap();
        assert_eq!(cards.len(), 10);
        assert!(cards.iter().any(|c| c.target == TargetRequirement::SelfOnly));
    }
}
