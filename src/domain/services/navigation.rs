use std::fmt;
use std::sync::Mutex;

/// Views the client can navigate to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    WaitingRoom { quiz_id: String },
    ActiveQuiz { quiz_id: String },
    Quizzes,
    CreateQuiz,
    Shop,
    Forum,
    Login,
    Register,
    AdminDashboard,
}

impl Route {
    pub fn waiting_room(quiz_id: &str) -> Self {
        Route::WaitingRoom {
            quiz_id: quiz_id.to_string(),
        }
    }

    pub fn active_quiz(quiz_id: &str) -> Self {
        Route::ActiveQuiz {
            quiz_id: quiz_id.to_string(),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::WaitingRoom { quiz_id } => format!("/quiz/{}/waiting-room", quiz_id),
            Route::ActiveQuiz { quiz_id } => format!("/quiz/{}/active", quiz_id),
            Route::Quizzes => "/quizzes".to_string(),
            Route::CreateQuiz => "/create-quiz".to_string(),
            Route::Shop => "/shop".to_string(),
            Route::Forum => "/forum".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::AdminDashboard => "/dashboard_admin".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outbound navigation sink (the router)
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that keeps every route it was sent, in order
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .map(|routes| routes.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
    }
}
