use crate::draw::DrawSession;
use serenity::all::{MessageId, UserId};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{
    sync::{oneshot, Mutex},
    time::Instant,
};

/// State which is lost across sessions
pub struct VolatileState {
    pub draw_sessions: DrawSessions,
    pub timers: Timers,
    /// Held while waiting for someone's next message, so two prompts never compete for one reply
    pub prompt_lock: Arc<Mutex<()>>,
}

impl VolatileState {
    pub async fn new() -> Self {
        Self {
            draw_sessions: DrawSessions::new(),
            timers: Timers::new(),
            prompt_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Open drawing boards, keyed by the message showing them
pub struct DrawSessions(HashMap<MessageId, ActiveDrawing>);

/// Whether a drawing board is still being edited
#[derive(Debug)]
pub enum Idle {
    /// Still in use; look again at this time
    Until(Instant),
    /// Went unused for too long and has been dropped
    Expired(DrawSession),
    /// Already closed
    Closed,
}

struct ActiveDrawing {
    session: DrawSession,
    last_used: Instant,
}

impl DrawSessions {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, message_id: MessageId, session: DrawSession, now: Instant) {
        self.0.insert(
            message_id,
            ActiveDrawing {
                session,
                last_used: now,
            },
        );
    }

    /// Session shown on `message_id`, unless it went unused for longer than `timeout`.  Expired
    /// sessions are dropped.
    pub fn get_mut(
        &mut self,
        message_id: MessageId,
        now: Instant,
        timeout: Duration,
    ) -> Option<&mut DrawSession> {
        let expired = match self.0.get(&message_id) {
            Some(active) => now.duration_since(active.last_used) >= timeout,
            None => return None,
        };

        if expired {
            self.0.remove(&message_id);
            return None;
        }

        self.0.get_mut(&message_id).map(|active| {
            active.last_used = now;
            &mut active.session
        })
    }

    /// Drop the session on `message_id` if it went unused for `timeout`, without touching it
    /// otherwise.
    pub fn check_idle(&mut self, message_id: MessageId, now: Instant, timeout: Duration) -> Idle {
        let Some(active) = self.0.get(&message_id) else {
            return Idle::Closed;
        };

        let deadline = active.last_used + timeout;
        if now < deadline {
            return Idle::Until(deadline);
        }
        match self.0.remove(&message_id) {
            Some(active) => Idle::Expired(active.session),
            None => Idle::Closed,
        }
    }

    pub fn remove(&mut self, message_id: MessageId) -> Option<DrawSession> {
        self.0.remove(&message_id).map(|active| active.session)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Running countdowns, at most one per user
pub struct Timers(HashMap<UserId, RunningTimer>);

struct RunningTimer {
    message_id: MessageId,
    stop: oneshot::Sender<()>,
}

impl Timers {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn is_running(&self, user_id: UserId) -> bool {
        self.0.contains_key(&user_id)
    }

    /// Register a countdown shown on `message_id`.  Returns false if the user already has one.
    pub fn start(
        &mut self,
        user_id: UserId,
        message_id: MessageId,
        stop: oneshot::Sender<()>,
    ) -> bool {
        if self.is_running(user_id) {
            return false;
        }
        self.0.insert(user_id, RunningTimer { message_id, stop });
        true
    }

    /// Signal the user's countdown to stop.  Returns false if none was running.
    pub fn stop(&mut self, user_id: UserId) -> bool {
        match self.0.remove(&user_id) {
            // The countdown may have just finished on its own
            Some(timer) => timer.stop.send(()).is_ok(),
            None => false,
        }
    }

    /// Forget a countdown that ended, unless a newer one replaced it
    pub fn finish(&mut self, user_id: UserId, message_id: MessageId) {
        if self.0.get(&user_id).map(|timer| timer.message_id) == Some(message_id) {
            self.0.remove(&user_id);
        }
    }

    pub fn owner_of(&self, message_id: MessageId) -> Option<UserId> {
        self.0
            .iter()
            .find(|(_, timer)| timer.message_id == message_id)
            .map(|(user_id, _)| *user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Board;

    fn session() -> DrawSession {
        DrawSession::new(UserId::new(1), Board::new("⬜", 5, 5).unwrap())
    }

    #[test]
    fn idle_sessions_expire() {
        let timeout = Duration::from_secs(600);
        let start = Instant::now();
        let mut sessions = DrawSessions::new();
        sessions.insert(MessageId::new(10), session(), start);

        let later = start + Duration::from_secs(500);
        assert!(sessions.get_mut(MessageId::new(10), later, timeout).is_some());
        // Use refreshed the clock
        let much_later = later + Duration::from_secs(500);
        assert!(sessions.get_mut(MessageId::new(10), much_later, timeout).is_some());

        let too_late = much_later + Duration::from_secs(601);
        assert!(sessions.get_mut(MessageId::new(10), too_late, timeout).is_none());
        assert_eq!(sessions.len(), 0);
        assert!(sessions.get_mut(MessageId::new(11), start, timeout).is_none());
    }

    #[test]
    fn untouched_sessions_are_evicted() {
        let timeout = Duration::from_secs(600);
        let start = Instant::now();
        let mut sessions = DrawSessions::new();
        sessions.insert(MessageId::new(10), session(), start);
        sessions.insert(MessageId::new(11), session(), start);

        let later = start + Duration::from_secs(300);
        sessions.get_mut(MessageId::new(11), later, timeout);

        let deadline = start + timeout;
        assert!(matches!(
            sessions.check_idle(MessageId::new(10), later, timeout),
            Idle::Until(at) if at == deadline
        ));
        assert!(matches!(
            sessions.check_idle(MessageId::new(10), deadline, timeout),
            Idle::Expired(_)
        ));
        assert!(matches!(
            sessions.check_idle(MessageId::new(10), deadline, timeout),
            Idle::Closed
        ));

        // The touched one lives on
        assert!(matches!(
            sessions.check_idle(MessageId::new(11), deadline, timeout),
            Idle::Until(at) if at == later + timeout
        ));
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn one_timer_per_user() {
        let mut timers = Timers::new();
        let user = UserId::new(5);
        let (tx, mut rx) = oneshot::channel();
        assert!(timers.start(user, MessageId::new(1), tx));

        let (tx2, _rx2) = oneshot::channel();
        assert!(!timers.start(user, MessageId::new(2), tx2));
        assert_eq!(timers.owner_of(MessageId::new(1)), Some(user));

        assert!(timers.stop(user));
        assert_eq!(rx.try_recv(), Ok(()));
        assert!(!timers.stop(user));
    }

    #[test]
    fn finish_ignores_replaced_timers() {
        let mut timers = Timers::new();
        let user = UserId::new(5);
        let (tx, _rx) = oneshot::channel();
        timers.start(user, MessageId::new(2), tx);

        timers.finish(user, MessageId::new(1));
        assert!(timers.is_running(user));
        timers.finish(user, MessageId::new(2));
        assert!(!timers.is_running(user));
    }
}
