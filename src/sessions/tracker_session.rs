use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};
use web_time::Duration;

use crate::auth::{can_track, UserProfile};
use crate::resolver::{resolve, Resolution};
use crate::sessions::event_drain::EventDrain;
use crate::sync::client::SyncClient;
use crate::sync::documents::{GameMetadata, MetadataPatch, PresenceRecord, TeamGameDoc};
use crate::telemetry::{
    report_to_observer, RuleViolation, ViolationKind, ViolationObserver, ViolationSeverity,
};
use crate::{
    Config, GamePhase, GameState, MoveEffect, PendingPlay, PlayRecord, PlayType, RunnerMoveCommand,
    ScorebookError, ScorebookResult, TrackerEvent,
};

/// What happened when a play was selected.
///
/// Most plays pass through an adjustment phase before they reach the record;
/// the strikeout cannot change base state and commits on the spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The play is pending: adjust runners as needed, then
    /// [`confirm`](TrackerSession::confirm) or
    /// [`cancel_pending`](TrackerSession::cancel_pending) it.
    AwaitingConfirmation,
    /// The play was committed and published immediately.
    Committed,
}

/// Appends `event`, discarding the oldest entries once the queue exceeds
/// `cap`. Shared by every session type that queues [`TrackerEvent`]s.
pub(crate) fn queue_event<T: Config>(
    queue: &Mutex<VecDeque<TrackerEvent<T>>>,
    cap: usize,
    event: TrackerEvent<T>,
) {
    let mut queue = queue.lock();
    queue.push_back(event);
    while queue.len() > cap {
        queue.pop_front();
    }
}

/// A [`TrackerSession`] is one scorer's live view of one team's offense: it
/// owns the local [`GameState`], carries the play currently awaiting
/// confirmation, and keeps the game's shared documents up to date through a
/// [`SyncClient`].
///
/// # Scoring loop
///
/// 1. [`select_play`](Self::select_play) runs the deterministic resolver. A
///    strikeout commits immediately; everything else becomes the pending play.
/// 2. [`adjust`](Self::adjust) corrects runner placement on the pending play
///    as many times as needed.
/// 3. [`confirm`](Self::confirm) commits and publishes, or
///    [`cancel_pending`](Self::cancel_pending) discards.
/// 4. When the third out lands, a [`TrackerEvent::SideRetired`] is queued and
///    further plays are rejected until [`retire_side`](Self::retire_side)
///    confirms the transition.
///
/// # Publishing
///
/// Every committed change is pushed to the store before the call returns: the
/// team document is overwritten and the shared metadata is patched
/// last-write-wins. A failed publish leaves local state committed and returns
/// the store error; [`publish`](Self::publish) retries the upload whenever
/// the caller decides to.
///
/// # Events
///
/// Remote changes (the opponent's document, the shared metadata) and local
/// side-retired prompts are queued and drained through
/// [`events`](Self::events). The queue is bounded; see
/// [`with_event_queue_size`](crate::SessionBuilder::with_event_queue_size).
pub struct TrackerSession<T>
where
    T: Config,
{
    /// The local scoring machine for the tracked team's offense.
    state: GameState<T::PlayerId>,
    /// The play awaiting adjustment and confirmation, if any.
    pending: Option<PendingPlay<T::PlayerId>>,
    /// The store client every publish and subscription goes through.
    client: SyncClient<T>,
    /// The scorer operating this session; backs presence and authorization.
    profile: UserProfile<T>,
    /// The team whose offense this session records.
    team: T::TeamId,
    /// The other team in the game; its document feeds the event queue.
    opponent: T::TeamId,
    /// Whether the tracked team is the home side. Decides which metadata
    /// score slot this session owns.
    is_home: bool,
    /// Events queued by subscriptions and local transitions, oldest first.
    events: Arc<Mutex<VecDeque<TrackerEvent<T>>>>,
    /// Maximum number of events to queue before oldest are dropped.
    event_queue_size: usize,
    /// Minimum age before a publish refreshes the presence record.
    heartbeat_interval_ms: u64,
    /// Stamp of the last successful heartbeat, 0 before the first one.
    last_heartbeat_ms: u64,
    /// Optional observer for rule violations.
    violation_observer: Option<Arc<dyn ViolationObserver>>,
}

impl<T: Config> std::fmt::Debug for TrackerSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerSession")
            .field("team", &self.team)
            .field("opponent", &self.opponent)
            .field("is_home", &self.is_home)
            .field("inning", &self.state.inning())
            .field("half", &self.state.half())
            .field("outs", &self.state.outs())
            .field("score", &self.state.score())
            .field("phase", &self.state.phase())
            .field("has_pending_play", &self.pending.is_some())
            .field("queued_events", &self.events.lock().len())
            .finish_non_exhaustive()
    }
}

impl<T> TrackerSession<T>
where
    T: Config,
{
    /// Wires up a new session: installs the metadata and opponent
    /// subscriptions and writes the initial presence heartbeat.
    ///
    /// A failed subscription aborts the start; a failed heartbeat does not.
    /// Presence is advisory, so the session comes up anyway, reports a
    /// [`ViolationKind::Synchronization`] warning, and retries on the next
    /// publish.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn start(
        state: GameState<T::PlayerId>,
        client: SyncClient<T>,
        profile: UserProfile<T>,
        team: T::TeamId,
        opponent: T::TeamId,
        is_home: bool,
        heartbeat_interval: Duration,
        event_queue_size: usize,
        violation_observer: Option<Arc<dyn ViolationObserver>>,
    ) -> ScorebookResult<Self> {
        let events: Arc<Mutex<VecDeque<TrackerEvent<T>>>> = Arc::new(Mutex::new(VecDeque::new()));

        let queue = Arc::clone(&events);
        client.subscribe_metadata(Arc::new(move |metadata| {
            let event = match metadata {
                Some(metadata) => TrackerEvent::MetadataUpdated { metadata },
                None => TrackerEvent::MetadataLapsed,
            };
            queue_event(&queue, event_queue_size, event);
        }))?;

        let queue = Arc::clone(&events);
        let lapsed = opponent.clone();
        client.subscribe_team_state(
            opponent.clone(),
            Arc::new(move |state| {
                let event = match state {
                    Some(state) => TrackerEvent::TeamStateUpdated { state },
                    None => TrackerEvent::TeamStateLapsed {
                        team: lapsed.clone(),
                    },
                };
                queue_event(&queue, event_queue_size, event);
            }),
        )?;

        let mut session = Self {
            state,
            pending: None,
            client,
            profile,
            team,
            opponent,
            is_home,
            events,
            event_queue_size,
            heartbeat_interval_ms: u64::try_from(heartbeat_interval.as_millis())
                .unwrap_or(u64::MAX),
            last_heartbeat_ms: 0,
            violation_observer,
        };
        session.try_heartbeat();
        info!(team = ?session.team, "tracker session started");
        Ok(session)
    }

    // ##################
    // #   ACCESSORS    #
    // ##################

    /// The local scoring machine: innings, outs, bases, score, and the full
    /// play-by-play record.
    pub fn game_state(&self) -> &GameState<T::PlayerId> {
        &self.state
    }

    /// The play currently awaiting confirmation, if any.
    pub fn pending_play(&self) -> Option<&PendingPlay<T::PlayerId>> {
        self.pending.as_ref()
    }

    /// The team whose offense this session records.
    pub fn team(&self) -> &T::TeamId {
        &self.team
    }

    /// The other team in the game.
    pub fn opponent(&self) -> &T::TeamId {
        &self.opponent
    }

    /// The scorer currently operating this session.
    pub fn profile(&self) -> &UserProfile<T> {
        &self.profile
    }

    /// Whether the shared metadata has been touched within the liveness
    /// window. Reads through to the store.
    pub fn is_live(&self) -> ScorebookResult<bool> {
        self.client.is_live()
    }

    /// Fetches the current shared metadata from the store, `None` when the
    /// document does not exist yet.
    pub fn fetch_metadata(&self) -> ScorebookResult<Option<GameMetadata<T>>> {
        self.client.fetch_metadata()
    }

    /// Fetches the opponent's team document from the store, `None` when that
    /// tracker has not published yet.
    pub fn fetch_opponent_state(&self) -> ScorebookResult<Option<TeamGameDoc<T>>> {
        self.client.fetch_team_state(self.opponent.clone())
    }

    /// Everyone with a presence record on this game.
    ///
    /// Records are returned as stored; inspect
    /// [`last_seen_ms`](PresenceRecord::last_seen_ms) to judge staleness.
    pub fn scorers(&self) -> ScorebookResult<Vec<PresenceRecord<T>>> {
        self.client.presence_roster()
    }

    // ##################
    // #    SCORING     #
    // ##################

    /// Selects the play the batter just made and runs the deterministic
    /// resolver against the current bases.
    ///
    /// Most plays return [`SelectOutcome::AwaitingConfirmation`] and park as
    /// the pending play for adjustment. A strikeout commits and publishes on
    /// the spot and returns [`SelectOutcome::Committed`].
    ///
    /// # Errors
    /// - [`GameEnded`](ScorebookError::GameEnded) after [`end_game`](Self::end_game).
    /// - [`SideRetired`](ScorebookError::SideRetired) once the third out is
    ///   recorded, until [`retire_side`](Self::retire_side) confirms.
    /// - [`NotBatting`](ScorebookError::NotBatting) during the opponent's
    ///   half-inning.
    /// - [`PlayPending`](ScorebookError::PlayPending) while another play
    ///   awaits confirmation.
    /// - [`NotAuthorized`](ScorebookError::NotAuthorized) if the operating
    ///   profile may not track this team.
    /// - A store error if the immediate commit's publish fails; the play is
    ///   already committed locally and [`publish`](Self::publish) retries.
    pub fn select_play(&mut self, play: PlayType) -> ScorebookResult<SelectOutcome> {
        self.authorize()?;
        match self.state.phase() {
            GamePhase::Ended => return Err(ScorebookError::GameEnded),
            GamePhase::SideRetired => {
                return Err(ScorebookError::SideRetired {
                    outs: self.state.outs(),
                })
            }
            GamePhase::Live => {}
        }
        if !self.state.is_batting() {
            return Err(ScorebookError::NotBatting);
        }
        if self.pending.is_some() {
            return Err(ScorebookError::PlayPending);
        }
        let batter = self
            .state
            .current_batter()
            .ok_or_else(|| ScorebookError::InternalError {
                context: "batting order has no current batter".to_owned(),
            })?
            .id
            .clone();

        match resolve(play, batter, self.state.bases()) {
            Resolution::Immediate(pending) => {
                debug!(%play, "play commits without adjustment");
                self.commit_and_publish(pending)?;
                Ok(SelectOutcome::Committed)
            }
            Resolution::Pending(pending) => {
                debug!(%play, runs = pending.runs(), "play pending confirmation");
                self.pending = Some(pending);
                Ok(SelectOutcome::AwaitingConfirmation)
            }
        }
    }

    /// Applies one runner adjustment to the pending play.
    ///
    /// Commands addressing an empty base are no-ops reported as
    /// [`MoveEffect::Ignored`]. A placement that lands on an occupied base
    /// follows last-write-wins: the occupant is discarded, the effect reports
    /// them as [`MoveEffect::Displaced`], and a
    /// [`ViolationKind::BaseOccupancy`] warning goes to the violation
    /// observer. The move itself is never blocked.
    ///
    /// # Errors
    /// - [`InvalidRequest`](ScorebookError::InvalidRequest) when no play is
    ///   pending.
    /// - [`NotAuthorized`](ScorebookError::NotAuthorized) if the operating
    ///   profile may not track this team.
    pub fn adjust(
        &mut self,
        command: RunnerMoveCommand,
    ) -> ScorebookResult<MoveEffect<T::PlayerId>> {
        self.authorize()?;
        let Some(pending) = self.pending.as_mut() else {
            return Err(ScorebookError::InvalidRequest {
                info: "no pending play to adjust".to_owned(),
            });
        };
        let effect = pending.apply(command);
        if let MoveEffect::Displaced(runner) = &effect {
            let violation = RuleViolation::new(
                ViolationSeverity::Warning,
                ViolationKind::BaseOccupancy,
                format!("placement discarded the runner occupying the target base: {runner:?}"),
                concat!(file!(), ":", line!()),
            )
            .with_inning(self.state.inning())
            .with_context("command", format!("{command:?}"));
            report_to_observer(self.violation_observer.as_ref(), &violation);
        }
        Ok(effect)
    }

    /// Discards the pending play without committing it. Returns `true` when
    /// there was one to discard. No committed state ever observed the play,
    /// so nothing is published.
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                debug!(play = %pending.play(), "pending play cancelled");
                true
            }
            None => false,
        }
    }

    /// Commits the pending play to the record and publishes.
    ///
    /// Returns the committed record, or `Ok(None)` as a no-op when no play is
    /// pending. When the commit brings the out count to three, a
    /// [`TrackerEvent::SideRetired`] is queued so the caller can prompt the
    /// operator to confirm the half-inning transition.
    ///
    /// # Errors
    /// - [`NotAuthorized`](ScorebookError::NotAuthorized) if the operating
    ///   profile may not track this team.
    /// - A store error if the publish fails; the play is already committed
    ///   locally and [`publish`](Self::publish) retries.
    pub fn confirm(&mut self) -> ScorebookResult<Option<PlayRecord<T::PlayerId>>> {
        self.authorize()?;
        let Some(pending) = self.pending.take() else {
            trace!("confirm with no pending play; nothing to do");
            return Ok(None);
        };
        self.commit_and_publish(pending).map(Some)
    }

    /// Removes the most recent play from the record, restores the machine to
    /// the state before it, and republishes.
    ///
    /// Exactly one step deep: calling it twice undoes the two most recent
    /// plays. A play whose commit retired the side can be undone the same
    /// way; the machine steps back across the boundary into the recorded
    /// half-inning. With an empty history this is a no-op returning
    /// `Ok(None)`.
    ///
    /// # Errors
    /// - [`GameEnded`](ScorebookError::GameEnded) after [`end_game`](Self::end_game):
    ///   an ended game's record is final.
    /// - [`PlayPending`](ScorebookError::PlayPending) while a play awaits
    ///   confirmation: its tentative placement was computed against the state
    ///   being undone, so confirm or cancel it first.
    /// - [`NotAuthorized`](ScorebookError::NotAuthorized) if the operating
    ///   profile may not track this team.
    /// - A store error if the republish fails; the undo has already been
    ///   applied locally and [`publish`](Self::publish) retries.
    pub fn undo(&mut self) -> ScorebookResult<Option<PlayRecord<T::PlayerId>>> {
        self.authorize()?;
        if self.state.is_ended() {
            return Err(ScorebookError::GameEnded);
        }
        if self.pending.is_some() {
            return Err(ScorebookError::PlayPending);
        }
        match self.state.undo() {
            Some(record) => {
                info!(play = %record.play, batter = ?record.batter, "play undone");
                self.publish()?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    // ###########################
    // #   GAME FLOW CONTROL     #
    // ###########################

    /// Confirms the end of the current half-inning.
    ///
    /// While the tracked team bats, this requires three recorded outs and
    /// flips the machine into the opponent's half. While waiting through the
    /// opponent's half, it is the "opponent done" confirmation and opens the
    /// tracked team's next at-bat. Either way outs and bases reset and the
    /// new position is published.
    ///
    /// # Errors
    /// - [`SideNotRetired`](ScorebookError::SideNotRetired) when the tracked
    ///   half still has fewer than three outs.
    /// - [`GameEnded`](ScorebookError::GameEnded) after [`end_game`](Self::end_game).
    /// - [`NotAuthorized`](ScorebookError::NotAuthorized) if the operating
    ///   profile may not track this team.
    /// - A store error if the publish fails; the transition has already been
    ///   applied locally and [`publish`](Self::publish) retries.
    pub fn retire_side(&mut self) -> ScorebookResult<()> {
        self.authorize()?;
        self.state.retire_side()?;
        info!(
            inning = %self.state.inning(),
            half = %self.state.half(),
            "half-inning transition confirmed"
        );
        self.publish()
    }

    /// Ends the game. Terminal and idempotent: any pending play is discarded,
    /// no further plays or transitions are accepted, and the team document is
    /// published with `game_active` cleared so scoreboards stop treating the
    /// game as in progress.
    ///
    /// # Errors
    /// - [`NotAuthorized`](ScorebookError::NotAuthorized) if the operating
    ///   profile may not track this team.
    /// - A store error if the publish fails; the game is already ended
    ///   locally and [`publish`](Self::publish) retries.
    pub fn end_game(&mut self) -> ScorebookResult<()> {
        self.authorize()?;
        if self.pending.take().is_some() {
            debug!("pending play discarded by game end");
        }
        self.state.end_game();
        info!(score = self.state.score(), "game ended");
        self.publish()
    }

    /// Starts the game over: deletes both team documents, rewinds the shared
    /// metadata to its defaults, and rebuilds the local machine with the same
    /// batting order at the top of the first. Any pending play is discarded.
    ///
    /// Both trackers observe the reset through their subscriptions (the
    /// deleted documents deliver as "no data").
    ///
    /// # Errors
    /// - [`NotAuthorized`](ScorebookError::NotAuthorized) if the operating
    ///   profile may not track this team.
    /// - A store error if any of the three writes fails. Local state is only
    ///   rebuilt after the store reset succeeds.
    pub fn reset_game(&mut self) -> ScorebookResult<()> {
        self.authorize()?;
        let (home, away) = self.home_away();
        self.client.reset_game(home, away)?;
        self.pending = None;
        let order = self.state.batting_order().clone();
        let batting_half = self.state.batting_half();
        self.state = GameState::new(order, batting_half);
        info!(team = ?self.team, "game reset; local machine rebuilt");
        Ok(())
    }

    /// Records `pitcher` as the current pitcher for `team` in the shared
    /// metadata. Either side may be set; scoreboards display both.
    ///
    /// # Errors
    /// - [`InvalidRequest`](ScorebookError::InvalidRequest) when `team` is
    ///   not one of the two teams in this game.
    /// - [`NotAuthorized`](ScorebookError::NotAuthorized) if the operating
    ///   profile may not track this team.
    /// - A store error if the patch fails.
    pub fn set_pitcher(&mut self, team: T::TeamId, pitcher: T::PlayerId) -> ScorebookResult<()> {
        self.authorize()?;
        let (home, away) = self.home_away();
        let mut patch = MetadataPatch::empty();
        if team == home {
            patch.home_pitcher = Some(pitcher);
        } else if team == away {
            patch.away_pitcher = Some(pitcher);
        } else {
            return Err(ScorebookError::InvalidRequest {
                info: format!("team {team:?} is not in this game"),
            });
        }
        self.client.publish_metadata(patch)?;
        Ok(())
    }

    // ##########################
    // #   SYNC AND PRESENCE    #
    // ##########################

    /// Pushes the current local state to the store: overwrites the team
    /// document and patches the shared metadata with this session's inning,
    /// half, outs, and score slot.
    ///
    /// Every mutating call publishes on its own; this is the explicit retry
    /// handle for when one of those publishes failed.
    ///
    /// # Errors
    /// - A store error if either write fails.
    pub fn publish(&mut self) -> ScorebookResult<()> {
        self.client
            .publish_game_state(self.team.clone(), &self.state)?;
        self.client.publish_metadata(self.score_patch())?;
        self.maybe_heartbeat();
        Ok(())
    }

    /// Rewrites this scorer's presence record immediately.
    ///
    /// Publishes refresh presence on their own once the record is older than
    /// the configured heartbeat interval; call this from an idle timer to
    /// stay on the roster through quiet stretches.
    ///
    /// # Errors
    /// - A store error if the write fails.
    pub fn heartbeat(&mut self) -> ScorebookResult<()> {
        self.client.heartbeat(&self.profile)?;
        self.last_heartbeat_ms = crate::unix_millis_now();
        Ok(())
    }

    /// Swaps the operating scorer, for when the device changes hands
    /// mid-game.
    ///
    /// The swap itself always succeeds; authorization is enforced where
    /// actions happen, so the next mutating call fails with
    /// [`NotAuthorized`](ScorebookError::NotAuthorized) if the new scorer may
    /// not track this team. The presence record follows the handoff: the old
    /// scorer's record is removed best-effort and the new scorer's is written
    /// on the next heartbeat.
    pub fn set_profile(&mut self, profile: UserProfile<T>) {
        if profile.user == self.profile.user {
            self.profile = profile;
            return;
        }
        info!(from = ?self.profile.user, to = ?profile.user, "scorer handoff");
        if let Err(error) = self.client.stop_tracking(self.profile.user.clone()) {
            warn!(%error, "failed to clear the previous scorer's presence");
        }
        self.profile = profile;
        self.last_heartbeat_ms = 0;
        self.try_heartbeat();
    }

    /// Returns all events that happened since last queried for events. If the
    /// number of stored events exceeds the configured queue size, the oldest
    /// events will be discarded.
    pub fn events(&mut self) -> EventDrain<T> {
        EventDrain::from_queue(std::mem::take(&mut *self.events.lock()))
    }

    /// Shuts the session down: cancels every store subscription and removes
    /// this scorer's presence record. Idempotent. Dropping the session
    /// without calling this leaves the presence record to go stale on its
    /// own.
    ///
    /// # Errors
    /// - A store error if the presence removal fails; subscriptions are
    ///   cancelled regardless.
    pub fn shutdown(&mut self) -> ScorebookResult<()> {
        self.client.shutdown();
        self.client.stop_tracking(self.profile.user.clone())
    }

    // ##################
    // #   INTERNALS    #
    // ##################

    /// The authorization check every mutating entry point runs.
    fn authorize(&self) -> ScorebookResult<()> {
        if can_track(&self.profile, &self.team) {
            Ok(())
        } else {
            Err(ScorebookError::NotAuthorized {
                role: self.profile.role,
            })
        }
    }

    /// Commits `pending`, queues the side-retired prompt when the third out
    /// lands, and publishes. Returns the committed record.
    fn commit_and_publish(
        &mut self,
        pending: PendingPlay<T::PlayerId>,
    ) -> ScorebookResult<PlayRecord<T::PlayerId>> {
        let record = self.state.commit(pending)?.clone();
        debug!(
            play = %record.play,
            inning = %record.inning,
            outs = record.outs_after,
            runs = record.runs(),
            "play committed"
        );
        if record.retired_side() {
            queue_event(
                &self.events,
                self.event_queue_size,
                TrackerEvent::SideRetired {
                    inning: record.inning,
                    half: record.half,
                },
            );
        }
        self.publish()?;
        Ok(record)
    }

    /// The metadata fields this session owns: position plus its own score
    /// slot. The opponent's slot is never touched, so the two trackers'
    /// patches interleave without clobbering each other.
    fn score_patch(&self) -> MetadataPatch<T> {
        let mut patch = MetadataPatch {
            inning: Some(self.state.inning()),
            half: Some(self.state.half()),
            outs: Some(self.state.outs()),
            ..MetadataPatch::empty()
        };
        if self.is_home {
            patch.home_score = Some(self.state.score());
        } else {
            patch.away_score = Some(self.state.score());
        }
        patch
    }

    /// Home and away ids, reassembled from the tracked/opponent pair.
    fn home_away(&self) -> (T::TeamId, T::TeamId) {
        if self.is_home {
            (self.team.clone(), self.opponent.clone())
        } else {
            (self.opponent.clone(), self.team.clone())
        }
    }

    /// Refreshes presence when the last heartbeat has aged past the
    /// configured interval. Failures are tolerated: presence is advisory and
    /// the next publish retries.
    fn maybe_heartbeat(&mut self) {
        let now = crate::unix_millis_now();
        if now.saturating_sub(self.last_heartbeat_ms) >= self.heartbeat_interval_ms {
            self.try_heartbeat();
        }
    }

    fn try_heartbeat(&mut self) {
        match self.client.heartbeat(&self.profile) {
            Ok(_) => self.last_heartbeat_ms = crate::unix_millis_now(),
            Err(error) => {
                warn!(%error, "presence heartbeat failed; roster entry may go stale");
                let violation = RuleViolation::new(
                    ViolationSeverity::Warning,
                    ViolationKind::Synchronization,
                    format!("presence heartbeat failed: {error}"),
                    concat!(file!(), ":", line!()),
                );
                report_to_observer(self.violation_observer.as_ref(), &violation);
            }
        }
    }
}

// ###################
// # UNIT TESTS      #
// ###################
