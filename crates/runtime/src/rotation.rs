//! Data-driven priority lists.
//!
//! A [`RotationSpec`] is the static description of one rotation: an ordered
//! list of abilities, each with a target choice and extra conditions. It is
//! loaded from RON once at startup and compiled into a
//! `Node<TickContext>` selector that the engine walks every tick.
//!
//! ```ron
//! (
//!     name: "affliction",
//!     hold_while_casting: true,
//!     buffs: [(ability: 9, effect: 30)],
//!     cooldowns: Some((when: [TargetLivesLongerThan(seconds: 20.0)], abilities: [11])),
//!     aoe: Some((min_hostiles: 3, radius: 10.0, priorities: [
//!         (ability: 7, target: Spread(effect: 20, radius: 10.0)),
//!     ])),
//!     priorities: [
//!         (ability: 1, conditions: [Refreshable(effect: 20, on: Target)]),
//!         (ability: 3, label: Some("filler")),
//!     ],
//! )
//! ```
//!
//! Every entry is implicitly gated on its ability being ready, and entries
//! aimed at the primary target on a target existing.
//!
//! Blocks are tried in a fixed order: hold while casting, self buffs,
//! cooldowns, the AoE block, the execute block, then `priorities`.

use std::path::Path;

use behavior_tree::builder::selector;
use behavior_tree::{Effect, Guard, Node};
use combat_core::{AbilityId, EffectId, ResourceKind};
use serde::{Deserialize, Serialize};

use crate::config::{parse_ron, read_ron};
use crate::context::TickContext;
use crate::error::ConfigError;
use crate::nodes::{actions, conditions};
use crate::subtrees::patterns;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotationSpec {
    pub name: String,
    /// Stop walking (report `Running`) while a cast is in flight.
    #[serde(default)]
    pub hold_while_casting: bool,
    /// Self buffs kept up ahead of everything else.
    #[serde(default)]
    pub buffs: Vec<BuffUpkeep>,
    #[serde(default)]
    pub cooldowns: Option<CooldownBlock>,
    /// Multi-target block evaluated ahead of `priorities`.
    #[serde(default)]
    pub aoe: Option<AoeBlock>,
    #[serde(default)]
    pub execute: Option<ExecuteBlock>,
    pub priorities: Vec<PriorityEntry>,
}

/// Recast `ability` whenever the actor's `effect` is missing or refreshable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuffUpkeep {
    pub ability: AbilityId,
    pub effect: EffectId,
}

/// Major cooldowns pressed on the primary target, in order, while every
/// condition in `when` holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CooldownBlock {
    #[serde(default)]
    pub when: Vec<ConditionSpec>,
    pub abilities: Vec<AbilityId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AoeBlock {
    pub min_hostiles: usize,
    pub radius: f32,
    pub priorities: Vec<PriorityEntry>,
}

/// Priorities that only apply while the primary target is below `below`
/// health.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecuteBlock {
    pub below: f32,
    pub priorities: Vec<PriorityEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriorityEntry {
    #[serde(default)]
    pub label: Option<String>,
    pub ability: AbilityId,
    #[serde(default)]
    pub target: TargetChoice,
    #[serde(default)]
    pub conditions: Vec<ConditionSpec>,
}

/// Who an entry's ability is cast on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum TargetChoice {
    #[default]
    Primary,
    Actor,
    Untargeted,
    /// The hostile within `radius` lacking the actor's `effect` longest.
    Spread { effect: EffectId, radius: f32 },
    /// The most injured ally within `radius`.
    LowestAlly { radius: f32 },
}

/// Whose effects a condition inspects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    Actor,
    #[default]
    Target,
}

/// Serializable guard vocabulary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConditionSpec {
    ChargesWithin {
        ability: AbilityId,
        #[serde(default)]
        horizon: Option<f32>,
    },
    ChargesCapping {
        ability: AbilityId,
        within: f32,
    },
    Refreshable {
        effect: EffectId,
        #[serde(default)]
        on: Subject,
    },
    Active {
        effect: EffectId,
    },
    Stacks {
        effect: EffectId,
        #[serde(default)]
        on: Subject,
        at_least: u32,
    },
    ResourceAbove {
        kind: ResourceKind,
        value: f32,
    },
    ResourceBelow {
        kind: ResourceKind,
        value: f32,
    },
    ResourceAtLeast {
        kind: ResourceKind,
        value: f32,
    },
    ResourceCapping {
        kind: ResourceKind,
        within: f32,
    },
    HostilesNearTarget {
        radius: f32,
        at_least: usize,
    },
    HostilesAround {
        radius: f32,
        at_least: usize,
    },
    /// `assume_unknown` overrides the engine's reading of a missing estimate.
    TargetLivesLongerThan {
        seconds: f32,
        #[serde(default)]
        assume_unknown: Option<bool>,
    },
    TargetHealthBelow(f32),
    AllyHealthBelow {
        radius: f32,
        fraction: f32,
    },
    OffGlobalCooldown,
    Not(Box<ConditionSpec>),
    Any(Vec<ConditionSpec>),
}

impl ConditionSpec {
    pub fn compile(&self) -> Guard<TickContext> {
        match self {
            ConditionSpec::ChargesWithin { ability, horizon } => {
                conditions::charges_within(*ability, *horizon)
            }
            ConditionSpec::ChargesCapping { ability, within } => {
                conditions::charges_capping_within(*ability, *within)
            }
            ConditionSpec::Refreshable { effect, on } => match on {
                Subject::Actor => conditions::refreshable_on_self(*effect),
                Subject::Target => conditions::refreshable_on_target(*effect),
            },
            ConditionSpec::Active { effect } => conditions::active_on_self(*effect),
            ConditionSpec::Stacks {
                effect,
                on,
                at_least,
            } => match on {
                Subject::Actor => conditions::stacks_on_self(*effect, *at_least),
                Subject::Target => conditions::stacks_on_target(*effect, *at_least),
            },
            ConditionSpec::ResourceAbove { kind, value } => {
                conditions::resource_above(*kind, *value)
            }
            ConditionSpec::ResourceBelow { kind, value } => {
                conditions::resource_below(*kind, *value)
            }
            ConditionSpec::ResourceAtLeast { kind, value } => {
                conditions::resource_at_least(*kind, *value)
            }
            ConditionSpec::ResourceCapping { kind, within } => {
                conditions::resource_capping_within(*kind, *within)
            }
            ConditionSpec::HostilesNearTarget { radius, at_least } => {
                conditions::hostiles_near_target(*radius, *at_least)
            }
            ConditionSpec::HostilesAround { radius, at_least } => {
                conditions::hostiles_around(*radius, *at_least)
            }
            ConditionSpec::TargetLivesLongerThan {
                seconds,
                assume_unknown,
            } => match assume_unknown {
                Some(assume) => conditions::target_lives_longer_than_or(*seconds, *assume),
                None => conditions::target_lives_longer_than(*seconds),
            },
            ConditionSpec::TargetHealthBelow(fraction) => {
                conditions::target_health_below(*fraction)
            }
            ConditionSpec::AllyHealthBelow { radius, fraction } => {
                conditions::ally_health_below(*radius, *fraction)
            }
            ConditionSpec::OffGlobalCooldown => conditions::off_global_cooldown(),
            ConditionSpec::Not(inner) => conditions::not(inner.compile()),
            ConditionSpec::Any(options) => {
                conditions::any(options.iter().map(ConditionSpec::compile).collect())
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            ConditionSpec::HostilesNearTarget { radius, .. }
            | ConditionSpec::HostilesAround { radius, .. }
            | ConditionSpec::AllyHealthBelow { radius, .. } => check_radius(*radius),
            ConditionSpec::TargetHealthBelow(fraction) => check_fraction(*fraction),
            ConditionSpec::Not(inner) => inner.validate(),
            ConditionSpec::Any(options) => options.iter().try_for_each(ConditionSpec::validate),
            _ => Ok(()),
        }
    }
}

impl TargetChoice {
    fn effect(&self, ability: AbilityId) -> Effect<TickContext> {
        match *self {
            TargetChoice::Primary => actions::cast_on_primary(ability),
            TargetChoice::Actor => actions::cast_on_self(ability),
            TargetChoice::Untargeted => actions::cast_untargeted(ability),
            TargetChoice::Spread { effect, radius } => {
                actions::cast_on_spread_target(ability, effect, radius)
            }
            TargetChoice::LowestAlly { radius } => actions::cast_on_lowest_ally(ability, radius),
        }
    }
}

impl PriorityEntry {
    pub fn new(ability: AbilityId) -> Self {
        Self {
            label: None,
            ability,
            target: TargetChoice::default(),
            conditions: Vec::new(),
        }
    }

    pub fn on(mut self, target: TargetChoice) -> Self {
        self.target = target;
        self
    }

    pub fn when(mut self, condition: ConditionSpec) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn compile(&self) -> Node<TickContext> {
        let mut guards = vec![conditions::ability_ready(self.ability)];
        match self.target {
            TargetChoice::Primary => guards.push(conditions::has_target()),
            TargetChoice::Spread { effect, radius } => {
                guards.push(conditions::spread_candidate_refreshable(effect, radius));
            }
            _ => {}
        }
        guards.extend(self.conditions.iter().map(ConditionSpec::compile));

        let label = match &self.label {
            Some(label) => label.clone(),
            None => format!("cast[{}]", self.ability.0),
        };
        Node::Action {
            label: label.into(),
            guard: conditions::all(guards),
            effect: self.target.effect(self.ability),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.target {
            TargetChoice::Spread { radius, .. } | TargetChoice::LowestAlly { radius } => {
                check_radius(radius)?
            }
            _ => {}
        }
        self.conditions.iter().try_for_each(ConditionSpec::validate)
    }
}

impl RotationSpec {
    /// Parses and validates a rotation from RON text.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let spec: Self = parse_ron(text, "<inline>")?;
        spec.validate()?;
        Ok(spec)
    }

    /// Loads and validates a rotation from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let spec: Self = read_ron(path)?;
        spec.validate()?;
        tracing::debug!(name = %spec.name, entries = spec.len(), "loaded rotation");
        Ok(spec)
    }

    /// Number of entries across every block.
    pub fn len(&self) -> usize {
        self.buffs.len()
            + self.cooldowns.as_ref().map_or(0, |cd| cd.abilities.len())
            + self.aoe.as_ref().map_or(0, |aoe| aoe.priorities.len())
            + self.execute.as_ref().map_or(0, |ex| ex.priorities.len())
            + self.priorities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("rotation name is empty".into()));
        }
        if self.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "rotation `{}` has no priorities",
                self.name
            )));
        }
        if let Some(cooldowns) = &self.cooldowns {
            cooldowns.when.iter().try_for_each(ConditionSpec::validate)?;
        }
        if let Some(aoe) = &self.aoe {
            check_radius(aoe.radius)?;
            aoe.priorities.iter().try_for_each(PriorityEntry::validate)?;
        }
        if let Some(execute) = &self.execute {
            check_fraction(execute.below)?;
            execute.priorities.iter().try_for_each(PriorityEntry::validate)?;
        }
        self.priorities.iter().try_for_each(PriorityEntry::validate)
    }

    /// Compiles the rotation into its root selector.
    pub fn build(&self) -> Node<TickContext> {
        let mut children = Vec::with_capacity(self.len() + 3);
        if self.hold_while_casting {
            children.push(patterns::hold_while_casting());
        }
        children.extend(
            self.buffs
                .iter()
                .map(|buff| patterns::maintain_buff(buff.ability, buff.effect)),
        );
        if let Some(cooldowns) = &self.cooldowns {
            children.extend(cooldowns.abilities.iter().map(|&ability| {
                let when = cooldowns.when.iter().map(ConditionSpec::compile).collect();
                patterns::cooldown_when(ability, conditions::all(when))
            }));
        }
        if let Some(aoe) = &self.aoe {
            children.push(patterns::aoe_gate(
                aoe.min_hostiles,
                aoe.radius,
                aoe.priorities.iter().map(PriorityEntry::compile).collect(),
            ));
        }
        if let Some(execute) = &self.execute {
            children.push(patterns::execute_phase(
                execute.below,
                execute.priorities.iter().map(PriorityEntry::compile).collect(),
            ));
        }
        children.extend(self.priorities.iter().map(PriorityEntry::compile));
        selector(self.name.clone(), children)
    }
}

fn check_fraction(fraction: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(ConfigError::Invalid(format!(
            "health fraction {fraction} outside [0, 1]"
        )));
    }
    Ok(())
}

fn check_radius(radius: f32) -> Result<(), ConfigError> {
    if radius.is_nan() || radius < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "radius {radius} must be non-negative"
        )));
    }
    Ok(())
}
