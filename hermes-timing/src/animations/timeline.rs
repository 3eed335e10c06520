use std::fmt::{Display, Formatter};

use log::trace;

use crate::animations::Player;
use crate::errors::{Error, TimingError};

/// Represents the clock all players are scheduled against.
///
/// - Playing a [`Player`] schedules it at the current clock time and registers it as a root.
/// - Advancing the clock re-derives the current time of every root (and of all their descendants)
///   from the time elapsed since it was scheduled.
/// - Roots are never removed implicitly: a finished player keeps reporting an advancing time until
///   it is [`removed`](Timeline::remove()).
///
/// # Example
/// ```
/// use hermes_timing::animations::{Effect, Player, Timeline};
/// use hermes_timing::targets::StyleTarget;
///
/// let group = Player::group(vec![
///     Effect::new(StyleTarget::new("body"), vec![], 2000.0).unwrap().into(),
///     Effect::new(StyleTarget::new("body"), vec![], 1000.0).unwrap().into(),
/// ])
/// .unwrap();
///
/// let mut timeline = Timeline::new();
/// timeline.tick_to(100.0).unwrap();
/// let player = timeline.play(group).unwrap();
///
/// timeline.tick_to(1200.0).unwrap();
/// assert_eq!(player.get_current_time(), 1100.0);
/// assert_eq!(player.get_child_players()[1].get_current_time(), 1000.0);
/// ```
#[derive(Debug, Default)]
pub struct Timeline {
    /// The clock time (in ms).
    current_time: f64,
    /// The root players, in play order.
    players: Vec<Player>,
}

impl Timeline {
    /// Creates a new timeline with its clock at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plays a player: schedules it at the current clock time and registers it as a root.
    ///
    /// All descendants are scheduled at `parent start time + start offset`, with a current time of
    /// minus their cumulated offset.
    ///
    /// # Errors
    /// * `AlreadyOwned` - the player is the child of a composite player.
    /// * `AlreadyPlaying` - the player, or one of its descendants, is already scheduled.
    pub fn play<P: Into<Player>>(&mut self, player: P) -> Result<Player, Error> {
        let player = player.into();
        if player.is_owned() {
            return Err(TimingError::AlreadyOwned.into());
        }
        if player.has_scheduled() {
            return Err(TimingError::AlreadyPlaying.into());
        }

        trace!(
            "Play {} player at {}ms (duration={}ms)",
            player.get_kind(),
            self.current_time,
            player.get_duration()
        );
        player.schedule(self.current_time);
        player.set_root(true);
        self.players.push(player.clone());
        Ok(player)
    }

    /// Advances the clock by `delta` milliseconds and re-derives all players.
    pub fn tick(&mut self, delta: f64) -> Result<(), Error> {
        self.current_time += delta;
        trace!("Tick timeline to {}ms", self.current_time);
        for player in &self.players {
            let start_time = player.get_start_time().ok_or(TimingError::DetachedPlayer)?;
            player.set_current_time(self.current_time - start_time)?;
        }
        Ok(())
    }

    /// Advances the clock up to the given time and re-derives all players.
    pub fn tick_to(&mut self, time: f64) -> Result<(), Error> {
        self.tick(time - self.current_time)
    }

    /// Removes a root player from the timeline.
    ///
    /// The player (and its descendants) are unscheduled: they may be played again.
    /// Returns whether the player was found.
    pub fn remove(&mut self, player: &Player) -> bool {
        match self.players.iter().position(|p| p.ptr_eq(player)) {
            None => false,
            Some(index) => {
                let player = self.players.remove(index);
                trace!("Remove {} player from timeline", player.get_kind());
                player.unschedule();
                true
            }
        }
    }

    /// Removes all players and rewinds the clock to 0.
    pub fn reset(&mut self) {
        for player in self.players.drain(..) {
            player.unschedule();
        }
        self.current_time = 0.0;
    }

    /// Returns the clock time (in ms).
    pub fn get_current_time(&self) -> f64 {
        self.current_time
    }

    /// Returns the root players, in play order.
    pub fn get_players(&self) -> &Vec<Player> {
        &self.players
    }
}

impl Display for Timeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Timeline [time={}ms, players={}]",
            self.current_time,
            self.players.len()
        )
    }
}
