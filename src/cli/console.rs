use crate::domain::services::{Navigator, Notification, NotificationVariant, Notifier, Route};

/// Prints navigation requests
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!("Navigating to {}", route);
        println!("-> {}", route);
    }
}

/// Prints notifications; destructive ones go to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Destructive => {
                eprintln!("[!] {}: {}", notification.title, notification.description)
            }
            NotificationVariant::Success => {
                println!("[+] {}: {}", notification.title, notification.description)
            }
            NotificationVariant::Default => {
                println!("[*] {}: {}", notification.title, notification.description)
            }
        }
    }
}
