//! Role-based authorization for tracking a team.
//!
//! The check runs once, at session start: a [`TrackerSession`] refuses to
//! build for a user who may not track the requested team, and nothing inside
//! the state machine re-checks afterwards. Read-only consumption (the
//! scoreboard) is open to everyone.
//!
//! [`TrackerSession`]: crate::TrackerSession

use serde::{Deserialize, Serialize};

use crate::Config;

/// A user's role within the league.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// League administrator.
    Admin,
    /// League staff.
    LeagueStaff,
    /// Designated scorekeeper; may track any team.
    Scorekeeper,
    /// Team captain; may track their own team only.
    Captain,
    /// Team staff; may track their own team only.
    TeamStaff,
    /// Regular member; may not track.
    Member,
}

impl Role {
    /// Returns `true` for roles that may track any team in the league.
    #[inline]
    #[must_use]
    pub const fn is_league_wide(self) -> bool {
        matches!(self, Role::Admin | Role::LeagueStaff | Role::Scorekeeper)
    }

    /// Returns `true` for roles whose tracking rights are scoped to their
    /// own team.
    #[inline]
    #[must_use]
    pub const fn is_team_scoped(self) -> bool {
        matches!(self, Role::Captain | Role::TeamStaff)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::Admin => "admin",
            Role::LeagueStaff => "league_staff",
            Role::Scorekeeper => "scorekeeper",
            Role::Captain => "captain",
            Role::TeamStaff => "team_staff",
            Role::Member => "member",
        };
        write!(f, "{label}")
    }
}

/// The identity a tracking attempt is authorized against.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct UserProfile<T>
where
    T: Config,
{
    /// The user's identity.
    pub user: T::UserId,
    /// Name shown to other scorers in the presence roster.
    pub display_name: String,
    /// The user's league role.
    pub role: Role,
    /// The team this user belongs to, if any. Team-scoped roles are useless
    /// without one.
    pub team: Option<T::TeamId>,
}

impl<T: Config> UserProfile<T> {
    /// Creates a profile with no team affiliation.
    pub fn new(user: T::UserId, display_name: impl Into<String>, role: Role) -> Self {
        UserProfile {
            user,
            display_name: display_name.into(),
            role,
            team: None,
        }
    }

    /// Sets the team affiliation.
    #[must_use]
    pub fn with_team(mut self, team: T::TeamId) -> Self {
        self.team = Some(team);
        self
    }
}

impl<T: Config> Clone for UserProfile<T> {
    fn clone(&self) -> Self {
        UserProfile {
            user: self.user.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            team: self.team.clone(),
        }
    }
}

impl<T: Config> PartialEq for UserProfile<T> {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user
            && self.display_name == other.display_name
            && self.role == other.role
            && self.team == other.team
    }
}

impl<T: Config> std::fmt::Debug for UserProfile<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let UserProfile {
            user,
            display_name,
            role,
            team,
        } = self;
        f.debug_struct("UserProfile")
            .field("user", user)
            .field("display_name", display_name)
            .field("role", role)
            .field("team", team)
            .finish()
    }
}

/// Answers "may this user track this team".
///
/// League-wide roles (admin, league staff, scorekeeper) may track any team.
/// Team-scoped roles (captain, team staff) may track exactly their own team,
/// and only when the profile carries one. Members may not track at all.
#[must_use]
pub fn can_track<T: Config>(profile: &UserProfile<T>, team: &T::TeamId) -> bool {
    if profile.role.is_league_wide() {
        return true;
    }
    if profile.role.is_team_scoped() {
        return profile.team.as_ref() == Some(team);
    }
    false
}

// ###################
// # UNIT TESTS      #
// ###################
