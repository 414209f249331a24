use practice_core::model::SessionId;
use tokio::sync::watch;

/// What is known about the backend session a run's records belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// `create_session` is still in flight.
    Pending,
    Linked(SessionId),
    /// Creation failed or was never attempted.
    Unavailable,
}

/// Shared, awaitable handle on the backend session id.
///
/// Background deliveries wait on the link; the controller never does.
#[derive(Debug, Clone)]
pub struct SessionLink {
    rx: watch::Receiver<LinkState>,
}

/// Write side of a pending [`SessionLink`]. Dropping it unresolved marks the
/// link unavailable.
#[derive(Debug)]
pub struct LinkResolver {
    tx: watch::Sender<LinkState>,
}

impl SessionLink {
    /// A link that will be resolved by the returned resolver.
    #[must_use]
    pub fn pending() -> (LinkResolver, Self) {
        let (tx, rx) = watch::channel(LinkState::Pending);
        (LinkResolver { tx }, Self { rx })
    }

    #[must_use]
    pub fn linked(id: SessionId) -> Self {
        let (_tx, rx) = watch::channel(LinkState::Linked(id));
        Self { rx }
    }

    #[must_use]
    pub fn unavailable() -> Self {
        let (_tx, rx) = watch::channel(LinkState::Unavailable);
        Self { rx }
    }

    #[must_use]
    pub fn state(&self) -> LinkState {
        let state = *self.rx.borrow();
        // a resolver dropped without answering leaves the link unresolvable
        if state == LinkState::Pending && self.rx.has_changed().is_err() {
            return LinkState::Unavailable;
        }
        state
    }

    /// Wait until session creation has finished one way or the other.
    pub async fn resolve(mut self) -> Option<SessionId> {
        let settled = match self.state() {
            LinkState::Pending => self
                .rx
                .wait_for(|s| *s != LinkState::Pending)
                .await
                .map(|s| *s)
                .unwrap_or(LinkState::Unavailable),
            other => other,
        };
        match settled {
            LinkState::Linked(id) => Some(id),
            LinkState::Pending | LinkState::Unavailable => None,
        }
    }
}

impl LinkResolver {
    pub fn link(self, id: SessionId) {
        self.tx.send_replace(LinkState::Linked(id));
    }

    pub fn fail(self) {
        self.tx.send_replace(LinkState::Unavailable);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_once_linked() {
        let (resolver, link) = SessionLink::pending();
        let waiter = tokio::spawn(link.clone().resolve());
        assert_eq!(link.state(), LinkState::Pending);
        resolver.link(SessionId::new(12));
        assert_eq!(waiter.await.unwrap(), Some(SessionId::new(12)));
        assert_eq!(link.state(), LinkState::Linked(SessionId::new(12)));
    }

    #[tokio::test]
    async fn failed_or_dropped_resolver_yields_none() {
        let (resolver, link) = SessionLink::pending();
        resolver.fail();
        assert_eq!(link.resolve().await, None);

        let (resolver, link) = SessionLink::pending();
        drop(resolver);
        assert_eq!(link.state(), LinkState::Unavailable);
        assert_eq!(link.resolve().await, None);
    }

    #[tokio::test]
    async fn settled_links_resolve_immediately() {
        assert_eq!(SessionLink::unavailable().resolve().await, None);
        assert_eq!(
            SessionLink::linked(SessionId::new(3)).resolve().await,
            Some(SessionId::new(3))
        );
    }
}
