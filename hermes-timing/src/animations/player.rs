use std::fmt::{Display, Formatter};
use std::sync::Arc;

use log::trace;
use parking_lot::RwLock;

use crate::animations::layout::{layout_group, layout_sequence};
use crate::animations::Effect;
use crate::errors::{Error, TimingError};

/// Lists the kinds of [`Player`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerKind {
    /// Plays a single [`Effect`].
    Leaf,
    /// Plays its children in parallel.
    Group,
    /// Plays its children one after the other, in order.
    Sequence,
}

impl Display for PlayerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            PlayerKind::Leaf => "Leaf",
            PlayerKind::Group => "Group",
            PlayerKind::Sequence => "Sequence",
        };
        write!(f, "{}", kind)
    }
}

#[derive(Debug)]
enum Content {
    Leaf(Effect),
    Group(Vec<Player>),
    Sequence(Vec<Player>),
}

#[derive(Debug)]
struct PlayerNode {
    content: Content,
    /// Time shift relative to the parent origin (in ms).
    start_offset: f64,
    /// Intrinsic duration (in ms).
    duration: f64,
    /// Clock time the player was scheduled at (in ms).
    start_time: Option<f64>,
    /// Unclamped local time (in ms).
    local_time: f64,
    /// Whether the player is scheduled directly on a timeline.
    root: bool,
    /// Whether the player is the child of a composite player.
    owned: bool,
}

/// Represents a timing node: a leaf wrapping an [`Effect`], or a composite (group or sequence)
/// owning ordered children.
///
/// - A player is built from effects and children, then played on a
///   [`Timeline`](crate::animations::Timeline).
/// - Its start time is fixed when it gets scheduled: only its current time evolves afterward.
/// - The current time of a child is the current time of its parent minus its start offset.
///
/// `Player` is a handle: clones share the same node, so the player returned by
/// [`Timeline::play()`](crate::animations::Timeline::play()) observes every clock advance.
///
/// # Example
///
/// Here is a sequence of two effects: the second one starts once the first one is done.
/// ```
/// use hermes_timing::animations::{Effect, Player, Timeline};
/// use hermes_timing::targets::StyleTarget;
///
/// let target = StyleTarget::new("body");
/// let sequence = Player::sequence(vec![
///     Effect::new(target.clone(), vec![], 2000.0).unwrap().into(),
///     Effect::new(target.clone(), vec![], 1000.0).unwrap().into(),
/// ])
/// .unwrap();
/// assert_eq!(sequence.get_duration(), 3000.0);
///
/// let mut timeline = Timeline::new();
/// timeline.tick_to(110.0).unwrap();
/// let player = timeline.play(sequence).unwrap();
///
/// let second = player.get_child_players()[1].clone();
/// assert_eq!(second.get_start_time(), Some(2110.0));
/// assert_eq!(second.get_current_time(), -2000.0);
/// ```
#[derive(Clone, Debug)]
pub struct Player {
    node: Arc<RwLock<PlayerNode>>,
}

impl Player {
    fn new(content: Content, duration: f64) -> Self {
        Self {
            node: Arc::new(RwLock::new(PlayerNode {
                content,
                start_offset: 0.0,
                duration,
                start_time: None,
                local_time: 0.0,
                root: false,
                owned: false,
            })),
        }
    }

    /// Creates a leaf player for the given effect.
    pub fn leaf(effect: Effect) -> Self {
        let duration = effect.get_duration();
        Self::new(Content::Leaf(effect), duration)
    }

    /// Creates a player running its children in parallel.
    ///
    /// All children start with the group: the group duration is the longest child duration.
    ///
    /// # Errors
    /// * `AlreadyOwned` - a child already belongs to a composite player (or is given twice).
    /// * `AlreadyPlaying` - a child, or one of its descendants, is scheduled.
    pub fn group(children: Vec<Player>) -> Result<Self, Error> {
        Self::adopt(&children)?;
        let duration = layout_group(&children);
        Ok(Self::new(Content::Group(children), duration))
    }

    /// Creates a player running its children back to back, in the given order.
    ///
    /// Each child starts when its predecessor ends: the sequence duration is the sum of children
    /// durations.
    ///
    /// # Errors
    /// * `AlreadyOwned` - a child already belongs to a composite player (or is given twice).
    /// * `AlreadyPlaying` - a child, or one of its descendants, is scheduled.
    pub fn sequence(children: Vec<Player>) -> Result<Self, Error> {
        Self::adopt(&children)?;
        let duration = layout_sequence(&children);
        Ok(Self::new(Content::Sequence(children), duration))
    }

    /// Marks the children as owned, once all of them are known to be free.
    fn adopt(children: &[Player]) -> Result<(), Error> {
        for (index, child) in children.iter().enumerate() {
            if child.is_owned() || children[..index].iter().any(|other| other.ptr_eq(child)) {
                return Err(TimingError::AlreadyOwned.into());
            }
            if child.has_scheduled() {
                return Err(TimingError::AlreadyPlaying.into());
            }
        }
        for child in children {
            child.node.write().owned = true;
        }
        Ok(())
    }

    // ########################################
    // Timing

    /// Re-derives the player times from the current time of its parent.
    ///
    /// The player local time becomes `parent_current_time - start_offset`, and all descendants
    /// are re-derived from it.
    ///
    /// # Errors
    /// `DetachedPlayer` if the player is not scheduled.
    pub fn advance(&self, parent_current_time: f64) -> Result<(), Error> {
        self.ensure_scheduled()?;
        let local_time = parent_current_time - self.get_start_offset();
        self.derive(local_time);
        Ok(())
    }

    /// Seeks the player to the given current time.
    ///
    /// All descendants are re-derived from it; ancestors are left untouched, as is the start
    /// time. The next clock advance overrides the seek for a root player.
    ///
    /// # Errors
    /// `DetachedPlayer` if the player is not scheduled.
    pub fn set_current_time(&self, time: f64) -> Result<(), Error> {
        self.ensure_scheduled()?;
        trace!("Seek {} player to {}ms", self.get_kind(), time);
        self.derive(time);
        Ok(())
    }

    /// Sets the local time and recursively derives children from it (unclamped).
    fn derive(&self, local_time: f64) {
        let children = {
            let mut node = self.node.write();
            node.local_time = local_time;
            Self::children_of(&node.content)
        };
        for child in children {
            child.derive(local_time - child.get_start_offset());
        }
    }

    /// Assigns the start time of the player and its descendants, and resets their local time
    /// relative to it.
    pub(crate) fn schedule(&self, start_time: f64) {
        self.schedule_from(start_time, 0.0);
    }

    fn schedule_from(&self, start_time: f64, local_time: f64) {
        let children = {
            let mut node = self.node.write();
            node.start_time = Some(start_time);
            node.local_time = local_time;
            Self::children_of(&node.content)
        };
        for child in children {
            let offset = child.get_start_offset();
            child.schedule_from(start_time + offset, local_time - offset);
        }
    }

    /// Clears the schedule of the player and its descendants: they may be played again.
    pub(crate) fn unschedule(&self) {
        let children = {
            let mut node = self.node.write();
            node.start_time = None;
            node.local_time = 0.0;
            node.root = false;
            Self::children_of(&node.content)
        };
        for child in children {
            child.unschedule();
        }
    }

    fn ensure_scheduled(&self) -> Result<(), Error> {
        match self.is_scheduled() {
            true => Ok(()),
            false => Err(TimingError::DetachedPlayer.into()),
        }
    }

    /// Indicates if the player, or any of its descendants, is scheduled.
    pub(crate) fn has_scheduled(&self) -> bool {
        self.is_scheduled()
            || self
                .get_child_players()
                .iter()
                .any(|child| child.has_scheduled())
    }

    /// Visits the tree in pre-order, handing every leaf effect along with its local time.
    pub(crate) fn visit_leaves<F: FnMut(&Effect, f64)>(&self, visitor: &mut F) {
        let children = {
            let node = self.node.read();
            if let Content::Leaf(effect) = &node.content {
                visitor(effect, node.local_time);
            }
            Self::children_of(&node.content)
        };
        for child in children {
            child.visit_leaves(visitor);
        }
    }

    fn children_of(content: &Content) -> Vec<Player> {
        match content {
            Content::Leaf(_) => vec![],
            Content::Group(children) | Content::Sequence(children) => children.clone(),
        }
    }

    // ########################################
    // Getters and setters

    pub fn get_kind(&self) -> PlayerKind {
        match self.node.read().content {
            Content::Leaf(_) => PlayerKind::Leaf,
            Content::Group(_) => PlayerKind::Group,
            Content::Sequence(_) => PlayerKind::Sequence,
        }
    }

    /// Returns the clock time at which the player was scheduled (`None` before it plays).
    pub fn get_start_time(&self) -> Option<f64> {
        self.node.read().start_time
    }

    /// Returns the player current time.
    ///
    /// The value is the local time of the player, capped to its duration, except for a root
    /// player (played directly on a timeline) whose time keeps advancing past its duration.
    /// The value is negative before the player starts.
    pub fn get_current_time(&self) -> f64 {
        let node = self.node.read();
        match node.root {
            true => node.local_time,
            false => node.local_time.min(node.duration),
        }
    }

    /// Returns the unclamped local time of the player.
    pub fn get_local_time(&self) -> f64 {
        self.node.read().local_time
    }

    pub fn get_start_offset(&self) -> f64 {
        self.node.read().start_offset
    }

    pub(crate) fn set_start_offset(&self, start_offset: f64) {
        self.node.write().start_offset = start_offset;
    }

    pub fn get_duration(&self) -> f64 {
        self.node.read().duration
    }

    /// Returns the children of the player (none for a leaf).
    pub fn get_child_players(&self) -> Vec<Player> {
        Self::children_of(&self.node.read().content)
    }

    /// Returns the effect of a leaf player.
    pub fn get_effect(&self) -> Option<Effect> {
        match &self.node.read().content {
            Content::Leaf(effect) => Some(effect.clone()),
            _ => None,
        }
    }

    /// Indicates if the player is played directly on a timeline.
    pub fn is_root(&self) -> bool {
        self.node.read().root
    }

    pub(crate) fn set_root(&self, root: bool) {
        self.node.write().root = root;
    }

    /// Indicates if the player is the child of a composite player.
    pub fn is_owned(&self) -> bool {
        self.node.read().owned
    }

    /// Indicates if the player is scheduled (itself or through one of its ancestors).
    pub fn is_scheduled(&self) -> bool {
        self.node.read().start_time.is_some()
    }

    /// Indicates if both handles point to the same player.
    pub fn ptr_eq(&self, other: &Player) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    fn fmt_tree(&self, f: &mut Formatter<'_>, depth: usize) -> std::fmt::Result {
        let start_time = match self.get_start_time() {
            None => String::from("-"),
            Some(start_time) => format!("{}ms", start_time),
        };
        writeln!(
            f,
            "{:indent$}{} [duration={}ms, offset={}ms, start={}, current={}ms]",
            "",
            self.get_kind(),
            self.get_duration(),
            self.get_start_offset(),
            start_time,
            self.get_current_time(),
            indent = depth * 2
        )?;
        if let Some(effect) = self.get_effect() {
            writeln!(f, "{:indent$}{}", "", effect, indent = (depth + 1) * 2)?;
        }
        for child in self.get_child_players() {
            child.fmt_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

// ########################################
// Conversion helpers

impl From<Effect> for Player {
    fn from(effect: Effect) -> Self {
        Player::leaf(effect)
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::mocks::MockTarget;

    use super::*;

    fn leaf(duration: f64) -> Player {
        Effect::new(MockTarget::new("body"), vec![], duration)
            .unwrap()
            .into()
    }

    fn simple_group() -> Player {
        Player::group(vec![leaf(2000.0), leaf(1000.0), leaf(3000.0)]).unwrap()
    }

    fn simple_sequence() -> Player {
        Player::sequence(vec![leaf(2000.0), leaf(1000.0), leaf(3000.0)]).unwrap()
    }

    #[test]
    fn test_new_players() {
        let player = leaf(2000.0);
        assert_eq!(player.get_kind(), PlayerKind::Leaf);
        assert_eq!(player.get_duration(), 2000.0);
        assert_eq!(player.get_start_offset(), 0.0);
        assert_eq!(player.get_start_time(), None);
        assert_eq!(player.get_current_time(), 0.0);
        assert!(player.get_child_players().is_empty());
        assert!(player.get_effect().is_some());
        assert!(!player.is_root());
        assert!(!player.is_scheduled());

        let group = simple_group();
        assert_eq!(group.get_kind(), PlayerKind::Group);
        assert_eq!(group.get_duration(), 3000.0);
        assert_eq!(group.get_child_players().len(), 3);
        assert!(group.get_effect().is_none());

        let sequence = simple_sequence();
        assert_eq!(sequence.get_kind(), PlayerKind::Sequence);
        assert_eq!(sequence.get_duration(), 6000.0);

        assert_eq!(Player::group(vec![]).unwrap().get_duration(), 0.0);
        assert_eq!(Player::sequence(vec![]).unwrap().get_duration(), 0.0);
    }

    #[test]
    fn test_sequence_offsets() {
        let sequence = simple_sequence();
        let offsets: Vec<f64> = sequence
            .get_child_players()
            .iter()
            .map(|child| child.get_start_offset())
            .collect();
        assert_eq!(offsets, vec![0.0, 2000.0, 3000.0]);
    }

    #[test]
    fn test_nested_durations() {
        let inner = Player::group(vec![leaf(2.0), leaf(1.0)]).unwrap();
        let sequence = Player::sequence(vec![leaf(2.0), inner]).unwrap();
        let tree = Player::group(vec![leaf(5.0), sequence, leaf(1.0)]).unwrap();
        assert_eq!(tree.get_duration(), 5.0);
        assert_eq!(tree.get_child_players()[1].get_duration(), 4.0);
    }

    #[test]
    fn test_children_are_owned() {
        let child = leaf(1000.0);
        assert!(!child.is_owned());
        let group = Player::group(vec![child.clone()]).unwrap();
        assert!(child.is_owned());
        assert!(!group.is_owned());

        // Another composite cannot take it over, nor move its offset.
        let error = Player::sequence(vec![leaf(500.0), child.clone()]).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Timing error: Player already belongs to a composite player."
        );
        assert_eq!(child.get_start_offset(), 0.0);

        group.schedule(0.0);
        assert_eq!(child.get_start_time(), Some(0.0));
        assert_eq!(child.get_current_time(), 0.0);
    }

    #[test]
    fn test_rejected_composite_adopts_nothing() {
        let first = leaf(10.0);
        let twice = leaf(20.0);
        assert!(Player::sequence(vec![first.clone(), twice.clone(), twice.clone()]).is_err());
        assert!(!first.is_owned());
        assert!(!twice.is_owned());
        assert_eq!(twice.get_start_offset(), 0.0);

        let sequence = Player::sequence(vec![first, twice.clone()]).unwrap();
        assert_eq!(sequence.get_duration(), 30.0);
        assert_eq!(twice.get_start_offset(), 10.0);
    }

    #[test]
    fn test_scheduled_player_cannot_be_adopted() {
        let root = simple_group();
        root.schedule(0.0);
        root.set_root(true);

        let error = Player::sequence(vec![leaf(500.0), root.clone()]).unwrap_err();
        assert_eq!(error.to_string(), "Timing error: Player is already playing.");
        assert_eq!(root.get_start_offset(), 0.0);
        assert!(!root.is_owned());
    }

    #[test]
    fn test_detached_player() {
        let player = simple_group();
        let error = player.set_current_time(10.0).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Timing error: Player is not attached to a playing timeline."
        );
        assert!(player.advance(10.0).is_err());
        assert!(player.get_child_players()[0].advance(10.0).is_err());
    }

    #[test]
    fn test_schedule() {
        let sequence = simple_sequence();
        sequence.schedule(110.0);

        let children = sequence.get_child_players();
        assert_eq!(sequence.get_start_time(), Some(110.0));
        assert_eq!(children[0].get_start_time(), Some(110.0));
        assert_eq!(children[1].get_start_time(), Some(2110.0));
        assert_eq!(children[2].get_start_time(), Some(3110.0));
        assert_eq!(children[1].get_current_time(), -2000.0);
        assert_eq!(children[2].get_current_time(), -3000.0);
        assert!(children.iter().all(|child| child.is_scheduled()));
        assert!(sequence.has_scheduled());
    }

    #[test]
    fn test_advance_clamps_children_only() {
        let group = simple_group();
        group.schedule(0.0);
        group.set_root(true);
        group.set_current_time(3100.0).unwrap();

        assert_eq!(group.get_current_time(), 3100.0);
        let times: Vec<f64> = group
            .get_child_players()
            .iter()
            .map(|child| child.get_current_time())
            .collect();
        assert_eq!(times, vec![2000.0, 1000.0, 3000.0]);

        // Local times are kept unclamped.
        assert_eq!(group.get_child_players()[1].get_local_time(), 3100.0);
    }

    #[test]
    fn test_advance_from_parent_time() {
        let sequence = simple_sequence();
        sequence.schedule(0.0);
        let second = sequence.get_child_players()[1].clone();

        second.advance(2500.0).unwrap();
        assert_eq!(second.get_current_time(), 500.0);
        // Ancestors are untouched.
        assert_eq!(sequence.get_current_time(), 0.0);
    }

    #[test]
    fn test_set_current_time_propagates_unclamped() {
        let inner = Player::group(vec![leaf(2.0), leaf(1.0)]).unwrap();
        let sequence = Player::sequence(vec![leaf(1.0), inner.clone()]).unwrap();
        sequence.schedule(0.0);

        sequence.set_current_time(5.0).unwrap();
        // The inner group is capped at 2, but its children derive from its local time (4).
        assert_eq!(inner.get_current_time(), 2.0);
        assert_eq!(inner.get_child_players()[0].get_local_time(), 4.0);
        assert_eq!(inner.get_child_players()[0].get_current_time(), 2.0);
    }

    #[test]
    fn test_unschedule() {
        let group = simple_group();
        group.schedule(100.0);
        group.set_root(true);
        group.unschedule();

        assert!(!group.has_scheduled());
        assert!(!group.is_root());
        assert_eq!(group.get_start_time(), None);
    }

    #[test]
    fn test_visit_leaves_in_pre_order() {
        let inner = Player::group(vec![leaf(3.0), leaf(1.0)]).unwrap();
        let sequence = Player::sequence(vec![leaf(2.0), inner]).unwrap();
        let tree = Player::group(vec![leaf(5.0), sequence, leaf(4.0)]).unwrap();
        let mut durations = vec![];
        tree.visit_leaves(&mut |effect: &Effect, _| durations.push(effect.get_duration()));
        assert_eq!(durations, vec![5.0, 2.0, 3.0, 1.0, 4.0]);
    }

    #[test]
    fn test_ptr_eq() {
        let player = leaf(1.0);
        let clone = player.clone();
        assert!(player.ptr_eq(&clone));
        assert!(!player.ptr_eq(&leaf(1.0)));
    }

    #[test]
    fn test_display_implementation() {
        let sequence = Player::sequence(vec![leaf(2.0), leaf(1.0)]).unwrap();
        assert_eq!(
            sequence.to_string(),
            "Sequence [duration=3ms, offset=0ms, start=-, current=0ms]\n  \
             Leaf [duration=2ms, offset=0ms, start=-, current=0ms]\n    \
             Effect [target=body, duration=2ms, keyframes=0]\n  \
             Leaf [duration=1ms, offset=2ms, start=-, current=0ms]\n    \
             Effect [target=body, duration=1ms, keyframes=0]\n"
        );

        sequence.schedule(10.0);
        assert!(sequence
            .to_string()
            .starts_with("Sequence [duration=3ms, offset=0ms, start=10ms, current=0ms]"));
    }
}
