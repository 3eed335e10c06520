use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use log::{debug, trace};

use crate::animations::{Effect, Player, Timeline};
use crate::errors::Error;
use crate::targets::Target;
use crate::utils::Value;

/// A property value resolved by the [`Compositor`].
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    /// The name of the target the property belongs to.
    pub target: String,
    pub property: String,
    pub value: Value,
}

impl Display for Resolved {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{} = {}", self.target, self.property, self.value)
    }
}

/// A resolved value along with the target it must be written to.
struct Contribution {
    target: Box<dyn Target>,
    property: String,
    value: Value,
}

/// Resolves which effect drives each animated property, and writes the result to the targets.
///
/// The player tree is walked in pre-order (a composite before its children, children in order).
/// Every leaf whose local time lies within its active window `[0, duration)` contributes the
/// values it declares. When several active leaves declare the same property of the same target,
/// the one visited last wins: later siblings override earlier ones, whatever their depth.
///
/// Properties no active leaf declares are not written. A property written by the previous pass
/// that no leaf drives anymore is cleared on its target (see [`Target::clear_property()`]).
///
/// # Example
/// ```
/// use hermes_timing::animations::{Compositor, Effect, Keyframe, Player, Timeline};
/// use hermes_timing::targets::StyleTarget;
///
/// let target = StyleTarget::new("body").with_base("marginLeft", "0px");
/// let leaf = |value: &str, duration: f64| -> Player {
///     let keyframe = Keyframe::new().with_property("marginLeft", value);
///     Effect::new(target.clone(), vec![keyframe], duration).unwrap().into()
/// };
///
/// let mut timeline = Timeline::new();
/// let group = Player::group(vec![leaf("4px", 5.0), leaf("1px", 2.0)]).unwrap();
/// let player = timeline.play(group).unwrap();
///
/// let mut compositor = Compositor::new();
/// player.set_current_time(1.0).unwrap();
/// compositor.composite(&player).unwrap();
/// assert_eq!(target.get_computed("marginLeft").unwrap().as_str(), "1px");
///
/// player.set_current_time(3.0).unwrap();
/// compositor.composite(&player).unwrap();
/// assert_eq!(target.get_computed("marginLeft").unwrap().as_str(), "4px");
/// ```
#[derive(Debug, Default)]
pub struct Compositor {
    /// The (target, property) pairs currently holding a value written by this compositor.
    driven: Vec<(Box<dyn Target>, String)>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the value of every animated property of the given player tree, without writing
    /// anything.
    ///
    /// Values are listed in the order their property was first encountered.
    pub fn resolve(player: &Player) -> Vec<Resolved> {
        Self::collect(std::slice::from_ref(player))
            .into_iter()
            .map(|contribution| Resolved {
                target: contribution.target.get_name(),
                property: contribution.property,
                value: contribution.value,
            })
            .collect()
    }

    /// Resolves the given player tree and writes the result to the targets.
    ///
    /// # Errors
    /// The first error returned by a target is returned unchanged (remaining writes are skipped).
    /// Properties written before the failure are still tracked, so a later pass clears them.
    pub fn composite(&mut self, player: &Player) -> Result<(), Error> {
        self.composite_players(std::slice::from_ref(player))
    }

    /// Resolves all players of the timeline as a single pass and writes the result to the targets.
    ///
    /// Players are walked in play order: a player played later overrides the properties of a
    /// player played before it.
    pub fn composite_timeline(&mut self, timeline: &Timeline) -> Result<(), Error> {
        self.composite_players(timeline.get_players())
    }

    /// Returns the (target name, property) pairs currently driven by this compositor.
    pub fn get_driven(&self) -> Vec<(String, String)> {
        self.driven
            .iter()
            .map(|(target, property)| (target.get_name(), property.clone()))
            .collect()
    }

    fn composite_players(&mut self, players: &[Player]) -> Result<(), Error> {
        let contributions = Self::collect(players);
        trace!("Composite {} properties", contributions.len());

        let mut index = 0;
        while index < self.driven.len() {
            let (target, property) = &mut self.driven[index];
            let still_driven = contributions.iter().any(|contribution| {
                contribution.property == *property
                    && contribution.target.get_name() == target.get_name()
            });
            if still_driven {
                index += 1;
                continue;
            }
            debug!(
                "Clear {}.{}: no effect drives it anymore",
                target.get_name(),
                property
            );
            target.clear_property(property)?;
            self.driven.remove(index);
        }

        for mut contribution in contributions {
            contribution
                .target
                .set_property(&contribution.property, contribution.value)?;
            if !self.is_driven(&*contribution.target, &contribution.property) {
                self.driven.push((contribution.target, contribution.property));
            }
        }
        Ok(())
    }

    fn is_driven(&self, target: &dyn Target, property: &str) -> bool {
        self.driven
            .iter()
            .any(|(driven, name)| name == property && driven.get_name() == target.get_name())
    }

    /// Walks the players and keeps, for each (target, property), the value of the last active
    /// leaf declaring it.
    fn collect(players: &[Player]) -> Vec<Contribution> {
        let mut contributions: Vec<Contribution> = vec![];
        let mut index: HashMap<(String, String), usize> = HashMap::new();

        let mut visitor = |effect: &Effect, local_time: f64| {
            let values = match effect.sample(local_time) {
                None => return,
                Some(values) => values,
            };
            let name = effect.get_target().get_name();
            for (property, value) in values {
                let key = (name.clone(), property.clone());
                match index.get(&key) {
                    Some(&position) => {
                        debug!(
                            "{}.{}: {} overrides {}",
                            key.0, key.1, value, contributions[position].value
                        );
                        contributions[position].value = value;
                        contributions[position].target = effect.clone_target();
                    }
                    None => {
                        index.insert(key, contributions.len());
                        contributions.push(Contribution {
                            target: effect.clone_target(),
                            property,
                            value,
                        });
                    }
                }
            }
        };

        for player in players {
            player.visit_leaves(&mut visitor);
        }
        contributions
    }
}

#[cfg(test)]
mod tests {
    use crate::animations::Keyframe;
    use crate::errors::TargetError;
    use crate::mocks::MockTarget;
    use crate::targets::StyleTarget;

    use super::*;

    fn leaf(target: &MockTarget, value: &str, duration: f64) -> Player {
        Effect::new(
            target.clone(),
            vec![
                Keyframe::new().with_property("marginLeft", value),
                Keyframe::new().with_property("marginLeft", value),
            ],
            duration,
        )
        .unwrap()
        .into()
    }

    // 44444
    // 11
    //   33
    //   2
    // 0
    fn complex_tree(target: &MockTarget) -> Player {
        let inner = Player::group(vec![leaf(target, "3px", 2.0), leaf(target, "2px", 1.0)]);
        let sequence = Player::sequence(vec![leaf(target, "1px", 2.0), inner.unwrap()]);
        Player::group(vec![
            leaf(target, "4px", 5.0),
            sequence.unwrap(),
            leaf(target, "0px", 1.0),
        ])
        .unwrap()
    }

    fn resolved_at(player: &Player, time: f64) -> Option<String> {
        player.set_current_time(time).unwrap();
        Compositor::resolve(player)
            .into_iter()
            .find(|resolved| resolved.property == "marginLeft")
            .map(|resolved| resolved.value.to_string())
    }

    #[test]
    fn test_resolve_precedence() {
        let target = MockTarget::new("div");
        let mut timeline = Timeline::new();
        let player = timeline.play(complex_tree(&target)).unwrap();

        assert_eq!(resolved_at(&player, 0.0).as_deref(), Some("0px"));
        assert_eq!(resolved_at(&player, 1.0).as_deref(), Some("1px"));
        assert_eq!(resolved_at(&player, 2.0).as_deref(), Some("2px"));
        assert_eq!(resolved_at(&player, 3.0).as_deref(), Some("3px"));
        assert_eq!(resolved_at(&player, 4.0).as_deref(), Some("4px"));
        assert_eq!(resolved_at(&player, 5.0), None);
    }

    #[test]
    fn test_resolve_ignores_leaves_outside_their_window() {
        let target = MockTarget::new("div");
        let mut timeline = Timeline::new();
        let sequence = Player::sequence(vec![leaf(&target, "1px", 2.0), leaf(&target, "2px", 2.0)]);
        let player = timeline.play(sequence.unwrap()).unwrap();

        // The second leaf sits at -1: not started yet.
        assert_eq!(resolved_at(&player, 1.0).as_deref(), Some("1px"));
        // The first one is done exactly at its duration.
        assert_eq!(resolved_at(&player, 2.0).as_deref(), Some("2px"));
        assert_eq!(resolved_at(&player, 4.0), None);
    }

    #[test]
    fn test_resolve_targets_separately() {
        let left = MockTarget::new("left");
        let right = MockTarget::new("right");
        let mut timeline = Timeline::new();
        let group = Player::group(vec![leaf(&left, "1px", 2.0), leaf(&right, "2px", 2.0)]);
        let player = timeline.play(group.unwrap()).unwrap();

        let resolved = Compositor::resolve(&player);
        assert_eq!(
            resolved,
            vec![
                Resolved {
                    target: "left".to_string(),
                    property: "marginLeft".to_string(),
                    value: Value::from("1px"),
                },
                Resolved {
                    target: "right".to_string(),
                    property: "marginLeft".to_string(),
                    value: Value::from("2px"),
                },
            ]
        );
        assert_eq!(resolved[0].to_string(), "left.marginLeft = 1px");
    }

    #[test]
    fn test_composite_writes_once_per_property() {
        let target = MockTarget::new("div");
        let mut timeline = Timeline::new();
        let player = timeline.play(complex_tree(&target)).unwrap();

        let mut compositor = Compositor::new();
        compositor.composite(&player).unwrap();
        assert_eq!(
            target.get_writes(),
            vec![("marginLeft".to_string(), Value::from("0px"))]
        );
        assert_eq!(
            compositor.get_driven(),
            vec![("div".to_string(), "marginLeft".to_string())]
        );
    }

    #[test]
    fn test_composite_clears_stale_properties() {
        let target = MockTarget::new("div");
        let mut timeline = Timeline::new();
        let player = timeline.play(leaf(&target, "1px", 2.0)).unwrap();

        let mut compositor = Compositor::new();
        compositor.composite(&player).unwrap();
        assert!(target.get_clears().is_empty());

        timeline.tick_to(2.0).unwrap();
        compositor.composite(&player).unwrap();
        assert_eq!(target.get_writes().len(), 1);
        assert_eq!(target.get_clears(), vec!["marginLeft".to_string()]);
        assert!(compositor.get_driven().is_empty());

        // Nothing left to clear.
        target.reset();
        compositor.composite(&player).unwrap();
        assert!(target.get_clears().is_empty());
        assert!(target.get_writes().is_empty());
    }

    #[test]
    fn test_composite_timeline_in_play_order() {
        let target = MockTarget::new("div");
        let mut timeline = Timeline::new();
        timeline.play(leaf(&target, "1px", 10.0)).unwrap();
        timeline.play(leaf(&target, "2px", 10.0)).unwrap();

        let mut compositor = Compositor::new();
        compositor.composite_timeline(&timeline).unwrap();
        assert_eq!(
            target.get_writes(),
            vec![("marginLeft".to_string(), Value::from("2px"))]
        );
    }

    #[test]
    fn test_composite_propagates_target_errors() {
        let target = MockTarget::new("div").with_failure();
        let mut timeline = Timeline::new();
        let player = timeline.play(leaf(&target, "1px", 2.0)).unwrap();

        let mut compositor = Compositor::new();
        let error = compositor.composite(&player).unwrap_err();
        assert!(matches!(error, TargetError { .. }));
        assert_eq!(error.to_string(), "Target error: div refused marginLeft.");
        assert!(compositor.get_driven().is_empty());
    }

    #[test]
    fn test_composite_tracks_writes_before_a_failure() {
        fn animate<T: Target + Clone + 'static>(target: &T) -> Player {
            let keyframes = vec![Keyframe::new().with_property("x", "anim")];
            Effect::new(target.clone(), keyframes, 10.0).unwrap().into()
        }

        let good = StyleTarget::new("a").with_base("x", "base");
        let bad = MockTarget::new("b").with_failure();
        let mut timeline = Timeline::new();
        let group = Player::group(vec![animate(&good), animate(&bad)]).unwrap();
        let player = timeline.play(group).unwrap();

        let mut compositor = Compositor::new();
        assert!(compositor.composite(&player).is_err());
        assert_eq!(good.get_computed("x"), Some(Value::from("anim")));
        assert_eq!(
            compositor.get_driven(),
            vec![("a".to_string(), "x".to_string())]
        );

        // Both effects are done: the written property falls back to its base value.
        timeline.tick_to(20.0).unwrap();
        compositor.composite(&player).unwrap();
        assert_eq!(good.get_computed("x"), Some(Value::from("base")));
        assert!(compositor.get_driven().is_empty());
    }

    #[test]
    fn test_targets_sharing_a_name_are_merged() {
        let first = MockTarget::new("div");
        let second = MockTarget::new("div");
        let mut timeline = Timeline::new();
        let group = Player::group(vec![leaf(&first, "1px", 2.0), leaf(&second, "2px", 2.0)]);
        let player = timeline.play(group.unwrap()).unwrap();

        let mut compositor = Compositor::new();
        compositor.composite(&player).unwrap();
        assert!(first.get_writes().is_empty());
        assert_eq!(
            second.get_writes(),
            vec![("marginLeft".to_string(), Value::from("2px"))]
        );
    }
}
