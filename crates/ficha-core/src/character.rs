use std::fmt;

use serde::{Deserialize, Serialize};

use crate::text::fold;

/// Highest level a character can reach.
pub const MAX_LEVEL: u32 = 20;

/// Life granted per point of constitution.
pub const LIFE_PER_CONSTITUTION: i32 = 5;

/// Stress ceiling; reaching it is a reportable event.
pub const STRESS_MAX: i32 = 200;

/// Largest value a stat or armor bonus may be set to. Keeps
/// `constitution × LIFE_PER_CONSTITUTION` and bonus sums far from overflow.
pub const STAT_MAX: i32 = 1_000_000;

/// Bag slots a freshly created character starts with.
pub const DEFAULT_BAG_CAPACITY: u32 = 6;

/// Identifier of the chat user who owns characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    /// Create an owner id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primary key of a character: its owner plus a name unique per owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterKey {
    /// The owning user.
    pub owner: OwnerId,
    /// Character name, unique for this owner.
    pub name: String,
}

impl CharacterKey {
    /// Build a key from an owner and a character name.
    pub fn new(owner: impl Into<OwnerId>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl From<String> for OwnerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for CharacterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One of the four core attributes, grown with attribute points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Raw physical power.
    Force,
    /// Movement and initiative.
    Speed,
    /// Avoiding blows.
    Dodge,
    /// Toughness; drives maximum life.
    Constitution,
}

impl Attribute {
    /// All attributes in sheet order.
    pub const ALL: [Attribute; 4] = [Self::Force, Self::Speed, Self::Dodge, Self::Constitution];

    /// Parse an attribute name (case- and accent-insensitive, short aliases
    /// accepted).
    pub fn parse(s: &str) -> Option<Self> {
        match fold(s).as_str() {
            "force" | "frc" | "str" | "forca" => Some(Self::Force),
            "speed" | "spd" | "vel" | "velocidade" => Some(Self::Speed),
            "dodge" | "ddg" | "esq" | "esquiva" => Some(Self::Dodge),
            "constitution" | "con" | "const" | "constituicao" => Some(Self::Constitution),
            _ => None,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Force => write!(f, "force"),
            Self::Speed => write!(f, "speed"),
            Self::Dodge => write!(f, "dodge"),
            Self::Constitution => write!(f, "constitution"),
        }
    }
}

/// One of the five resistances, grown with resistance points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resistance {
    /// Resisting stuns.
    Stun,
    /// Resisting plague.
    Plague,
    /// Resisting disease.
    Disease,
    /// Resisting bleeding.
    Bleed,
    /// Resisting debuffs.
    Debuff,
}

impl Resistance {
    /// All resistances in sheet order.
    pub const ALL: [Resistance; 5] = [
        Self::Stun,
        Self::Plague,
        Self::Disease,
        Self::Bleed,
        Self::Debuff,
    ];

    /// Parse a resistance name (case-insensitive, Portuguese names accepted).
    pub fn parse(s: &str) -> Option<Self> {
        match fold(s).as_str() {
            "stun" | "atordoamento" => Some(Self::Stun),
            "plague" | "peste" => Some(Self::Plague),
            "disease" | "doenca" | "doencas" => Some(Self::Disease),
            "bleed" | "bleeding" | "sangramento" => Some(Self::Bleed),
            "debuff" => Some(Self::Debuff),
            _ => None,
        }
    }
}

impl fmt::Display for Resistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stun => write!(f, "stun"),
            Self::Plague => write!(f, "plague"),
            Self::Disease => write!(f, "disease"),
            Self::Bleed => write!(f, "bleed"),
            Self::Debuff => write!(f, "debuff"),
        }
    }
}

/// Any numeric stat on the sheet that can be checked or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    /// A core attribute.
    Attribute(Attribute),
    /// A resistance.
    Resistance(Resistance),
}

impl Stat {
    /// Parse either an attribute or a resistance name.
    pub fn parse(s: &str) -> Option<Self> {
        Attribute::parse(s)
            .map(Self::Attribute)
            .or_else(|| Resistance::parse(s).map(Self::Resistance))
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute(a) => write!(f, "{a}"),
            Self::Resistance(r) => write!(f, "{r}"),
        }
    }
}

/// The four core attribute scores.
///
/// Scores are signed: armor bonuses may be negative and are applied to the
/// live `speed`/`dodge` scores verbatim so that unequipping restores them
/// exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    /// Force score.
    pub force: i32,
    /// Speed score (includes the equipped armor's speed bonus).
    pub speed: i32,
    /// Dodge score (includes the equipped armor's dodge bonus).
    pub dodge: i32,
    /// Constitution score.
    pub constitution: i32,
}

impl Attributes {
    /// Read one attribute.
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Force => self.force,
            Attribute::Speed => self.speed,
            Attribute::Dodge => self.dodge,
            Attribute::Constitution => self.constitution,
        }
    }

    /// Mutable access to one attribute.
    pub fn get_mut(&mut self, attribute: Attribute) -> &mut i32 {
        match attribute {
            Attribute::Force => &mut self.force,
            Attribute::Speed => &mut self.speed,
            Attribute::Dodge => &mut self.dodge,
            Attribute::Constitution => &mut self.constitution,
        }
    }
}

/// The five resistance scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resistances {
    /// Stun resistance.
    pub stun: i32,
    /// Plague resistance.
    pub plague: i32,
    /// Disease resistance.
    pub disease: i32,
    /// Bleed resistance.
    pub bleed: i32,
    /// Debuff resistance.
    pub debuff: i32,
}

impl Resistances {
    /// Read one resistance.
    pub fn get(&self, resistance: Resistance) -> i32 {
        match resistance {
            Resistance::Stun => self.stun,
            Resistance::Plague => self.plague,
            Resistance::Disease => self.disease,
            Resistance::Bleed => self.bleed,
            Resistance::Debuff => self.debuff,
        }
    }

    /// Mutable access to one resistance.
    pub fn get_mut(&mut self, resistance: Resistance) -> &mut i32 {
        match resistance {
            Resistance::Stun => &mut self.stun,
            Resistance::Plague => &mut self.plague,
            Resistance::Disease => &mut self.disease,
            Resistance::Bleed => &mut self.bleed,
            Resistance::Debuff => &mut self.debuff,
        }
    }
}

/// Everything needed to register a new character.
#[derive(Debug, Clone, Default)]
pub struct NewCharacter {
    /// Character name; surrounding whitespace is trimmed.
    pub name: String,
    /// Optional portrait image URL.
    pub portrait_url: Option<String>,
    /// Starting attribute scores.
    pub attributes: Attributes,
    /// Starting resistance scores.
    pub resistances: Resistances,
}

impl NewCharacter {
    /// A blank character with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the starting attribute scores.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the starting resistance scores.
    pub fn with_resistances(mut self, resistances: Resistances) -> Self {
        self.resistances = resistances;
        self
    }

    /// Set the portrait URL.
    pub fn with_portrait(mut self, url: impl Into<String>) -> Self {
        self.portrait_url = Some(url.into());
        self
    }
}

fn life_for(constitution: i32) -> i32 {
    constitution.max(0).saturating_mul(LIFE_PER_CONSTITUTION)
}

/// A character sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// The owning user.
    pub owner: OwnerId,
    /// Name, unique per owner.
    pub name: String,
    /// Optional portrait image URL.
    #[serde(default)]
    pub portrait_url: Option<String>,
    /// Level in `1..=MAX_LEVEL`.
    pub level: u32,
    /// Experience towards the next level.
    pub xp: u32,
    /// Unspent attribute points.
    pub attribute_points: u32,
    /// Unspent resistance points.
    pub resistance_points: u32,
    /// Core attribute scores.
    pub attributes: Attributes,
    /// Resistance scores.
    pub resistances: Resistances,
    /// Current life, in `0..=max_life()`.
    pub life: i32,
    /// Current stress, in `0..=STRESS_MAX`.
    pub stress: i32,
    /// Money in base (green) units.
    pub balance: u64,
    /// Number of distinct item stacks the bag holds.
    pub bag_capacity: u32,
    /// Name of the equipped weapon row, if any.
    pub equipped_weapon: Option<String>,
    /// Name of the equipped armor row, if any.
    pub equipped_armor: Option<String>,
}

impl Character {
    /// Build a level-1 character from a creation request.
    pub fn new(owner: OwnerId, request: NewCharacter, bag_capacity: u32) -> Self {
        let life = life_for(request.attributes.constitution);
        Self {
            owner,
            name: request.name.trim().to_string(),
            portrait_url: request.portrait_url,
            level: 1,
            xp: 0,
            attribute_points: 0,
            resistance_points: 0,
            attributes: request.attributes,
            resistances: request.resistances,
            life,
            stress: 0,
            balance: 0,
            bag_capacity,
            equipped_weapon: None,
            equipped_armor: None,
        }
    }

    /// The key this row is stored under.
    pub fn key(&self) -> CharacterKey {
        CharacterKey::new(self.owner.clone(), self.name.clone())
    }

    /// Maximum life, derived from constitution.
    pub fn max_life(&self) -> i32 {
        life_for(self.attributes.constitution)
    }

    /// Read any stat.
    pub fn stat(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Attribute(a) => self.attributes.get(a),
            Stat::Resistance(r) => self.resistances.get(r),
        }
    }

    /// Mutable access to any stat.
    pub fn stat_mut(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Attribute(a) => self.attributes.get_mut(a),
            Stat::Resistance(r) => self.resistances.get_mut(r),
        }
    }

    /// Returns true if the character has reached the level cap.
    pub fn is_max_level(&self) -> bool {
        self.level >= MAX_LEVEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kael() -> Character {
        let request = NewCharacter::named("  Kael  ").with_attributes(Attributes {
            force: 3,
            speed: 4,
            dodge: 5,
            constitution: 10,
        });
        Character::new(OwnerId::from("u1"), request, DEFAULT_BAG_CAPACITY)
    }

    #[test]
    fn new_character_starts_at_level_one_with_full_life() {
        let c = kael();
        assert_eq!(c.name, "Kael");
        assert_eq!(c.level, 1);
        assert_eq!(c.xp, 0);
        assert_eq!(c.life, 50);
        assert_eq!(c.max_life(), 50);
        assert_eq!(c.balance, 0);
        assert_eq!(c.stress, 0);
        assert_eq!(c.bag_capacity, 6);
        assert!(c.equipped_weapon.is_none());
        assert!(c.equipped_armor.is_none());
    }

    #[test]
    fn negative_constitution_gives_zero_life() {
        let mut c = kael();
        c.attributes.constitution = -2;
        assert_eq!(c.max_life(), 0);
    }

    #[test]
    fn huge_constitution_saturates_life() {
        let mut c = kael();
        c.attributes.constitution = i32::MAX;
        assert_eq!(c.max_life(), i32::MAX);
    }

    #[test]
    fn stat_access_by_kind() {
        let mut c = kael();
        assert_eq!(c.stat(Stat::Attribute(Attribute::Dodge)), 5);
        *c.stat_mut(Stat::Resistance(Resistance::Bleed)) += 2;
        assert_eq!(c.resistances.bleed, 2);
    }

    #[test]
    fn parse_stats() {
        assert_eq!(Attribute::parse("Force"), Some(Attribute::Force));
        assert_eq!(Attribute::parse("const"), Some(Attribute::Constitution));
        assert_eq!(Attribute::parse("luck"), None);
        assert_eq!(Resistance::parse(" PLAGUE "), Some(Resistance::Plague));
        assert_eq!(Resistance::parse("sangramento"), Some(Resistance::Bleed));
        assert_eq!(Attribute::parse("Esquiva"), Some(Attribute::Dodge));
        assert_eq!(Stat::parse("stun"), Some(Stat::Resistance(Resistance::Stun)));
        assert_eq!(Stat::parse("dodge"), Some(Stat::Attribute(Attribute::Dodge)));
        assert_eq!(Stat::parse("charisma"), None);
    }

    #[test]
    fn key_display() {
        let c = kael();
        assert_eq!(c.key().to_string(), "u1/Kael");
    }
}
