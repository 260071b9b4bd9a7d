use crate::domain::entities::{AuthUser, Profile, PurchaseRecord, PurchaseStatus, Role};
use crate::domain::services::Route;

/// What a menu entry does when picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Go(Route),
    /// Opens the join dialog in place
    JoinQuiz,
    /// Opens the purchase history dropdown
    Purchases,
    SignOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: MenuAction,
    /// Counter shown next to the label
    pub badge: Option<usize>,
}

impl MenuItem {
    fn new(label: &'static str, action: MenuAction) -> Self {
        Self {
            label,
            action,
            badge: None,
        }
    }
}

/// Signed-in user block of the profile dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBadge {
    pub initials: String,
    pub display_name: String,
    pub role_label: String,
    /// Students only
    pub points: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub items: Vec<MenuItem>,
    pub user: Option<UserBadge>,
}

impl Menu {
    pub fn labels(&self) -> Vec<&'static str> {
        self.items.iter().map(|item| item.label).collect()
    }

    pub fn find(&self, label: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.label == label)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Menu for the current user. Signed-out visitors get the login entries.
pub fn build_menu(user: Option<&AuthUser>, profile: Option<&Profile>, purchases: &[PurchaseRecord]) -> Menu {
    let (Some(user), Some(profile)) = (user, profile) else {
        return Menu {
            items: vec![
                MenuItem::new("Forum", MenuAction::Go(Route::Forum)),
                MenuItem::new("Login", MenuAction::Go(Route::Login)),
                MenuItem::new("Register", MenuAction::Go(Route::Register)),
            ],
            user: None,
        };
    };

    let mut items = Vec::new();
    if profile.is_professor() {
        items.push(MenuItem::new("Quizzes", MenuAction::Go(Route::Quizzes)));
        items.push(MenuItem::new("Create Quiz", MenuAction::Go(Route::CreateQuiz)));
    } else {
        items.push(MenuItem::new("Join Quiz", MenuAction::JoinQuiz));
    }

    if profile.is_student() {
        items.push(MenuItem::new("Shop", MenuAction::Go(Route::Shop)));
        let pending = purchases
            .iter()
            .filter(|p| p.status == PurchaseStatus::Pending)
            .count();
        items.push(MenuItem {
            label: "My Purchases",
            action: MenuAction::Purchases,
            badge: (pending > 0).then_some(pending),
        });
    }

    items.push(MenuItem::new("Forum", MenuAction::Go(Route::Forum)));
    items.push(MenuItem::new("Sign out", MenuAction::SignOut));

    Menu {
        items,
        user: Some(UserBadge {
            initials: user.initials(),
            display_name: user.display_name().to_string(),
            role_label: capitalize(profile.role.as_str()),
            points: profile.is_student().then_some(profile.points),
        }),
    }
}

/// Where a freshly signed-in user goes. Admins are sent to their dashboard.
pub fn landing_route(profile: Option<&Profile>) -> Route {
    match profile.map(|p| p.role) {
        Some(Role::Admin) => Route::AdminDashboard,
        _ => Route::Home,
    }
}
