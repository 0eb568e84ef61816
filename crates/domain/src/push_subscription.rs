use crate::shared::entity::{Entity, ID};

/// A browser or device registered to receive Web Push messages for a user.
///
/// Subscriptions are deactivated rather than deleted once the push service
/// reports them as expired, so they are not tried again.
#[derive(Debug, Clone, PartialEq)]
pub struct PushSubscription {
    pub id: ID,
    pub user_id: String,
    /// Push service url, unique across all subscriptions
    pub endpoint: String,
    /// Public key of the user agent, base64url encoded
    pub p256dh: String,
    /// Authentication secret, base64url encoded
    pub auth: String,
    pub user_agent: Option<String>,
    pub is_active: bool,
    pub created: i64,
}

impl PushSubscription {
    pub fn new(
        user_id: String,
        endpoint: String,
        p256dh: String,
        auth: String,
        user_agent: Option<String>,
        created: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            user_id,
            endpoint,
            p256dh,
            auth,
            user_agent,
            is_active: true,
            created,
        }
    }

    /// Takes over the keys and owner of a new registration for the same
    /// endpoint, keeping the id of this subscription.
    pub fn renew(&mut self, other: PushSubscription) {
        self.user_id = other.user_id;
        self.p256dh = other.p256dh;
        self.auth = other.auth;
        self.user_agent = other.user_agent;
        self.is_active = true;
    }
}

impl Entity for PushSubscription {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renew_keeps_id_and_reactivates() {
        let mut sub = PushSubscription::new(
            "u1".into(),
            "https://push.example/1".into(),
            "old".into(),
            "old".into(),
            None,
            0,
        );
        sub.is_active = false;
        let id = sub.id.clone();

        let new = PushSubscription::new(
            "u2".into(),
            "https://push.example/1".into(),
            "key".into(),
            "secret".into(),
            Some("Firefox".into()),
            10,
        );
        sub.renew(new);

        assert_eq!(sub.id, id);
        assert_eq!(sub.user_id, "u2");
        assert_eq!(sub.p256dh, "key");
        assert!(sub.is_active);
    }
}
