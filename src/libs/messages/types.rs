#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated(String),  // description
    TaskCompleted(String),
    TaskReopened(String),
    TaskDeleted(String),
    TaskNotFound(String), // selector
    TasksHeader,
    TasksEmpty,
    ConfirmDeleteTask(String),

    // === VALIDATION MESSAGES ===
    DescriptionRequired,
    InvalidDueDate(String),
    InvalidTaskSelector(String),

    // === REQUEST MESSAGES ===
    FetchFailed(String),
    RequestFailed(String),
    PolicyViolation,

    // === AUTH MESSAGES ===
    NotSignedIn,
    SessionExpired,
    RedirectToLogin,
    InvalidSessionToken,
    SignedIn(String), // email
    SignedUp(String),
    SignedOut,
    WrongCredentials,
    EmailAlreadyRegistered(String),
    ConfirmEmailSent(String),
    PasswordsDoNotMatch,
    PasswordTooShort(usize),
    CurrentIdentity { email: String, id: String, expires_at: String },

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModuleSupabase,
    ConfigModuleSession,
    SupabaseNotConfigured,
    UnknownBackend(String),
    BackendInUse(String),
    SessionTtlOutOfRange(i64), // max hours

    // === PROMPTS ===
    PromptSelectModules,
    PromptSelectBackend,
    PromptSupabaseUrl,
    PromptSupabaseAnonKey,
    PromptSessionTtl,
    PromptEmail,
    PromptPassword,
    PromptConfirmPassword,
    PromptDescription,
    PromptDueDate,
    PromptSelectAction,
    PromptSelectTask,
    PromptHaveAccount,
    PromptTryAgain,

    // === VIEW MENU ===
    MenuAddTask,
    MenuToggleTask,
    MenuDeleteTask,
    MenuRefresh,
    MenuLogout,
    MenuQuit,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
}
