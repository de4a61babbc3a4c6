//! Finite-state pagination session.
//!
//! A session is `Active { group, index }` until its timeout elapses, then
//! `Expired`. Only the owner's input moves it; navigation is bounded and
//! never wraps.

use std::time::Duration;

use tokio::time::Instant;

use super::page::{Page, PageGroup, PageSet};

/// Stand-in deadline for timeouts too large to add to an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Navigation control pressed by a user.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NavAction {
    First,
    Previous,
    Next,
    Last,
    /// Switch between the `More` and `Less` groups.
    Toggle,
}

impl NavAction {
    pub const ALL: [NavAction; 5] = [
        NavAction::First,
        NavAction::Previous,
        NavAction::Next,
        NavAction::Last,
        NavAction::Toggle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Previous => "prev",
            Self::Next => "next",
            Self::Last => "last",
            Self::Toggle => "toggle",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == raw)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    Active { group: PageGroup, index: usize },
    Expired,
}

/// Effect of one navigation input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transition {
    /// The visible page changed.
    Moved,
    /// Valid input that had nothing to do (e.g. `Next` on the last page).
    Unchanged,
    /// Input from someone other than the owner, or after expiry.
    Ignored,
}

/// Borrowed snapshot of what a session currently shows.
#[derive(Clone, Copy, Debug)]
pub struct SessionView<'a> {
    pub page: &'a Page,
    pub group: PageGroup,
    pub index: usize,
    pub total: usize,
    /// Group reachable through the toggle control, if any.
    pub toggle_target: Option<PageGroup>,
}

#[derive(Debug)]
pub struct PaginationSession {
    owner_id: u64,
    pages: PageSet,
    state: SessionState,
    started_at: Instant,
    timeout: Duration,
}

impl PaginationSession {
    /// Start a session on the first `More` page.
    pub fn new(owner_id: u64, pages: PageSet, timeout: Duration, now: Instant) -> Self {
        Self {
            owner_id,
            pages,
            state: SessionState::Active {
                group: PageGroup::More,
                index: 0,
            },
            started_at: now,
            timeout,
        }
    }

    pub fn owner_id(&self) -> u64 {
        self.owner_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pages(&self) -> &PageSet {
        &self.pages
    }

    /// Instant after which the session no longer accepts input.
    pub fn deadline(&self) -> Instant {
        self.started_at
            .checked_add(self.timeout)
            .or_else(|| self.started_at.checked_add(FAR_FUTURE))
            .unwrap_or(self.started_at)
    }

    /// Whether there is anything to navigate to.
    pub fn is_navigable(&self) -> bool {
        self.pages.len(PageGroup::More) > 1 || self.pages.has_group(PageGroup::Less)
    }

    /// Current page, or `None` once expired.
    pub fn view(&self) -> Option<SessionView<'_>> {
        let SessionState::Active { group, index } = self.state else {
            return None;
        };

        let toggle_target = Some(group.other()).filter(|other| self.pages.has_group(*other));

        Some(SessionView {
            page: self.pages.page(group, index)?,
            group,
            index,
            total: self.pages.len(group),
            toggle_target,
        })
    }

    /// Mark the session expired; returns whether it was still active.
    pub fn expire(&mut self) -> bool {
        let was_active = matches!(self.state, SessionState::Active { .. });
        self.state = SessionState::Expired;
        was_active
    }

    /// Apply one navigation input received at `at`.
    pub fn navigate(&mut self, actor_id: u64, action: NavAction, at: Instant) -> Transition {
        if at >= self.deadline() {
            self.expire();
            return Transition::Ignored;
        }

        let SessionState::Active { group, index } = self.state else {
            return Transition::Ignored;
        };

        if actor_id != self.owner_id {
            return Transition::Ignored;
        }

        let last = self.pages.len(group).saturating_sub(1);
        let (next_group, next_index) = match action {
            NavAction::First => (group, 0),
            NavAction::Previous => (group, index.saturating_sub(1)),
            NavAction::Next => (group, (index + 1).min(last)),
            NavAction::Last => (group, last),
            NavAction::Toggle => {
                let other = group.other();
                if self.pages.has_group(other) {
                    (other, index.min(self.pages.len(other) - 1))
                } else {
                    (group, index)
                }
            }
        };

        if (next_group, next_index) == (group, index) {
            return Transition::Unchanged;
        }

        self.state = SessionState::Active {
            group: next_group,
            index: next_index,
        };
        Transition::Moved
    }
}
