//! In-app notification list with an optional desktop side-channel.
//!
//! Desktop delivery is best effort. Without permission everything still lands
//! in the in-app list and nothing reports an error.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub time: chrono::DateTime<chrono::Utc>,
    pub read: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not asked yet
    #[default]
    Default,
    Granted,
    Denied,
    /// The host has no desktop notifications at all
    Unsupported,
}

#[async_trait::async_trait]
pub trait DesktopNotifier: Send + Sync {
    async fn request_permission(&self) -> Permission;

    fn show(&self, title: &str, body: &str);
}

/// Notifier for hosts without a desktop
pub struct HeadlessNotifier;

#[async_trait::async_trait]
impl DesktopNotifier for HeadlessNotifier {
    async fn request_permission(&self) -> Permission {
        Permission::Unsupported
    }

    fn show(&self, title: &str, _body: &str) {
        tracing::debug!(title, "Desktop notification dropped, no desktop");
    }
}

struct Inbox {
    items: Vec<Notification>,
    next_id: u64,
    permission: Permission,
}

pub struct NotificationCenter {
    notifier: Arc<dyn DesktopNotifier>,
    inbox: Mutex<Inbox>,
}

impl NotificationCenter {
    pub fn new(notifier: Arc<dyn DesktopNotifier>) -> Self {
        let center = Self {
            notifier,
            inbox: Mutex::new(Inbox {
                items: Vec::new(),
                next_id: 1,
                permission: Permission::Default,
            }),
        };
        center.insert(
            "Welcome to StreamAI",
            "Explore our new AI-powered recommendations feature.",
        );
        center
    }

    fn inbox(&self) -> MutexGuard<'_, Inbox> {
        self.inbox.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn insert(&self, title: &str, body: &str) -> Permission {
        let mut inbox = self.inbox();
        let id = inbox.next_id;
        inbox.next_id += 1;
        inbox.items.insert(
            0,
            Notification {
                id,
                title: title.to_string(),
                body: body.to_string(),
                time: chrono::Utc::now(),
                read: false,
            },
        );
        inbox.permission
    }

    /// Adds an unread notification, newest first
    pub fn push(&self, title: &str, body: &str) {
        let permission = self.insert(title, body);
        tracing::info!(title, "Notification posted");

        if permission == Permission::Granted {
            self.notifier.show(title, body);
        }
    }

    /// Opening the list marks everything read
    pub fn open(&self) -> Vec<Notification> {
        let mut inbox = self.inbox();
        for item in inbox.items.iter_mut() {
            item.read = true;
        }
        inbox.items.clone()
    }

    pub fn list(&self) -> Vec<Notification> {
        self.inbox().items.clone()
    }

    pub fn clear(&self) {
        self.inbox().items.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.inbox().items.iter().filter(|n| !n.read).count()
    }

    pub fn permission(&self) -> Permission {
        self.inbox().permission
    }

    /// Asks the desktop for permission. Refusal or lack of support is recorded
    /// and otherwise ignored.
    pub async fn request_permission(&self) -> Permission {
        if self.permission() == Permission::Granted {
            return Permission::Granted;
        }

        let permission = self.notifier.request_permission().await;
        self.inbox().permission = permission;

        match permission {
            Permission::Granted => self.notifier.show(
                "Notifications Enabled",
                "You will now receive updates for new movies & TV shows.",
            ),
            other => tracing::info!(permission = ?other, "Desktop notifications unavailable"),
        }

        permission
    }

    /// Posts a simulated "New Arrival" after `delay`. Abort the handle to cancel.
    pub fn schedule_arrival(self: &Arc<Self>, delay: Duration) -> JoinHandle<()> {
        let center = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            center.push(
                "New Arrival",
                "'Dune: Part Two' is now trending in Movies.",
            );
        })
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Arc::new(HeadlessNotifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct GrantingNotifier {
        shown: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl DesktopNotifier for GrantingNotifier {
        async fn request_permission(&self) -> Permission {
            Permission::Granted
        }

        fn show(&self, _title: &str, _body: &str) {
            self.shown.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_starts_with_unread_welcome() {
        let center = NotificationCenter::default();
        let items = center.list();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Welcome to StreamAI");
        assert_eq!(center.unread_count(), 1);
    }

    #[test]
    fn test_push_is_newest_first_and_open_marks_read() {
        let center = NotificationCenter::default();
        center.push("Second", "b");
        center.push("Third", "c");

        let titles: Vec<String> = center.list().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Third", "Second", "Welcome to StreamAI"]);
        assert_eq!(center.unread_count(), 3);

        let opened = center.open();
        assert!(opened.iter().all(|n| n.read));
        assert_eq!(center.unread_count(), 0);

        center.clear();
        assert!(center.list().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_permission_degrades_silently() {
        let center = NotificationCenter::default();

        assert_eq!(center.request_permission().await, Permission::Unsupported);
        center.push("Still here", "in-app only");
        assert_eq!(center.unread_count(), 2);
    }

    #[tokio::test]
    async fn test_granted_permission_forwards_to_desktop() {
        let notifier = Arc::new(GrantingNotifier {
            shown: AtomicUsize::new(0),
        });
        let center = NotificationCenter::new(notifier.clone());

        center.push("Before", "not forwarded");
        assert_eq!(notifier.shown.load(Ordering::SeqCst), 0);

        assert_eq!(center.request_permission().await, Permission::Granted);
        center.push("After", "forwarded");
        assert_eq!(notifier.shown.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_arrival_lands_after_delay() {
        let center = Arc::new(NotificationCenter::default());
        let _arrival = center.schedule_arrival(Duration::from_secs(5));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(center.list().len(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let items = center.list();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "New Arrival");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_arrival_never_lands() {
        let center = Arc::new(NotificationCenter::default());
        let arrival = center.schedule_arrival(Duration::from_secs(5));
        arrival.abort();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(center.list().len(), 1);
    }
}
