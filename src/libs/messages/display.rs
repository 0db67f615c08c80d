//! Display implementation for taskdue application messages.
//!
//! Every user-facing sentence is produced here, so commands and library code
//! only ever pass `Message` values around. Parameterised variants interpolate
//! their fields; the rest map to fixed text.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated(description) => format!("Task '{}' created", description),
            Message::TaskCompleted(description) => format!("Task '{}' marked as done", description),
            Message::TaskReopened(description) => format!("Task '{}' marked as open", description),
            Message::TaskDeleted(description) => format!("Task '{}' deleted", description),
            Message::TaskNotFound(selector) => format!("No task matches '{}'", selector),
            Message::TasksHeader => "Your tasks:".to_string(),
            Message::TasksEmpty => "No tasks yet. Add one with `taskdue add`.".to_string(),
            Message::ConfirmDeleteTask(description) => format!("Delete task '{}'?", description),

            // === VALIDATION MESSAGES ===
            Message::DescriptionRequired => "Description is required".to_string(),
            Message::InvalidDueDate(input) => format!("Invalid due date '{}', expected YYYY-MM-DD", input),
            Message::InvalidTaskSelector(input) => format!("'{}' is neither a list position nor a task id", input),

            // === REQUEST MESSAGES ===
            Message::FetchFailed(error) => format!("Could not load tasks: {}", error),
            Message::RequestFailed(error) => format!("Request failed: {}", error),
            Message::PolicyViolation => "New row violates the row-level policy for tasks".to_string(),

            // === AUTH MESSAGES ===
            Message::NotSignedIn => "You are not signed in".to_string(),
            Message::SessionExpired => "Your session has expired".to_string(),
            Message::RedirectToLogin => "Please sign in to continue".to_string(),
            Message::InvalidSessionToken => "Session token is invalid or expired".to_string(),
            Message::SignedIn(email) => format!("Signed in as {}", email),
            Message::SignedUp(email) => format!("Account created for {}", email),
            Message::SignedOut => "Signed out".to_string(),
            Message::WrongCredentials => "Invalid email or password".to_string(),
            Message::EmailAlreadyRegistered(email) => format!("An account for {} already exists", email),
            Message::ConfirmEmailSent(email) => format!("Check {} for a confirmation link, then log in", email),
            Message::PasswordsDoNotMatch => "Passwords do not match".to_string(),
            Message::PasswordTooShort(min) => format!("Password must be at least {} characters long", min),
            Message::CurrentIdentity { email, id, expires_at } => {
                format!("Signed in as {} (id {}), session valid until {}", email, id, expires_at)
            }

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigModuleSupabase => "Supabase settings".to_string(),
            Message::ConfigModuleSession => "Session settings".to_string(),
            Message::SupabaseNotConfigured => "Supabase backend selected but SUPABASE_URL / SUPABASE_ANON_KEY are not configured. Run `taskdue init`.".to_string(),
            Message::UnknownBackend(name) => format!("Unknown backend '{}', expected 'local' or 'supabase'", name),
            Message::BackendInUse(name) => format!("Using {} backend", name),
            Message::SessionTtlOutOfRange(max) => format!("Session lifetime must be between 1 and {} hours", max),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptSelectBackend => "Storage backend".to_string(),
            Message::PromptSupabaseUrl => "Supabase project URL".to_string(),
            Message::PromptSupabaseAnonKey => "Supabase anon key".to_string(),
            Message::PromptSessionTtl => "Local session lifetime (hours)".to_string(),
            Message::PromptEmail => "Email".to_string(),
            Message::PromptPassword => "Password".to_string(),
            Message::PromptConfirmPassword => "Confirm password".to_string(),
            Message::PromptDescription => "Description".to_string(),
            Message::PromptDueDate => "Due date (YYYY-MM-DD)".to_string(),
            Message::PromptSelectAction => "What next?".to_string(),
            Message::PromptSelectTask => "Select a task".to_string(),
            Message::PromptHaveAccount => "Do you already have an account?".to_string(),
            Message::PromptTryAgain => "Try again?".to_string(),

            // === VIEW MENU ===
            Message::MenuAddTask => "Add task".to_string(),
            Message::MenuToggleTask => "Toggle done".to_string(),
            Message::MenuDeleteTask => "Delete task".to_string(),
            Message::MenuRefresh => "Refresh".to_string(),
            Message::MenuLogout => "Log out".to_string(),
            Message::MenuQuit => "Quit".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed".to_string(),
        };
        write!(f, "{}", text)
    }
}
