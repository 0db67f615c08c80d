//! Hosted backend: a Supabase project.
//!
//! Authentication goes through the GoTrue endpoints under `/auth/v1`, tasks
//! through PostgREST under `/rest/v1/tasks`. Row-level security on the
//! server (see `supabase/migrations`) limits every request to the rows of
//! the user the bearer token belongs to, so no owner filter is sent.

use super::{AuthProvider, SessionFile, TaskBackend};
use crate::libs::config::ConfigModule;
use crate::libs::data_storage::DataStorage;
use crate::libs::error::{TaskError, TaskResult};
use crate::libs::messages::Message;
use crate::libs::session::{Identity, Session, SessionContext};
use crate::libs::task::{NewTask, Task};
use crate::msg_print;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SESSION_FILE: &str = ".supabase_session";
const SIGNUP_URL: &str = "auth/v1/signup";
const TOKEN_URL: &str = "auth/v1/token?grant_type=password";
const LOGOUT_URL: &str = "auth/v1/logout";
const TASKS_URL: &str = "rest/v1/tasks";
const APIKEY_HEADER: &str = "apikey";
const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "supabase".to_string(),
            name: "Supabase".to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), path)
    }

    pub fn init(config: &Option<SupabaseConfig>) -> Result<Self> {
        let config = config.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleSupabase);
        Ok(Self {
            url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSupabaseUrl.to_string())
                .default(config.url)
                .interact_text()?,
            anon_key: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSupabaseAnonKey.to_string())
                .default(config.anon_key)
                .interact_text()?,
        })
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthUser {
    id: Uuid,
    email: Option<String>,
}

/// Body of a successful password grant (and of sign-up when e-mail
/// confirmation is disabled).
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &str) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .unwrap_or_else(|| Utc::now() + Duration::seconds(self.expires_in));
        Session {
            access_token: self.access_token,
            expires_at,
            user: Identity {
                id: self.user.id,
                email: self.user.email.unwrap_or_else(|| fallback_email.to_string()),
            },
        }
    }
}

/// Maps an error response to the task error taxonomy.
async fn error_for(res: Response) -> TaskError {
    let status = res.status();
    let body = res.text().await.unwrap_or_default();
    tracing::debug!(%status, body = %body, "supabase request rejected");
    match status {
        StatusCode::UNAUTHORIZED => TaskError::Auth(Message::InvalidSessionToken),
        StatusCode::FORBIDDEN => TaskError::Request(Message::PolicyViolation),
        _ => TaskError::Request(Message::RequestFailed(format!("{} {}", status, body))),
    }
}

/// Interprets the answer of a GoTrue sign-in (`TOKEN_URL`) or sign-up
/// (`SIGNUP_URL`) call. `None` is a sign-up whose address still needs
/// confirming: the body is a bare user instead of a token.
async fn session_from(res: Response, path: &str, email: &str) -> TaskResult<Option<Session>> {
    match res.status() {
        status if status.is_success() => {
            let body = res.text().await?;
            match serde_json::from_str::<TokenResponse>(&body) {
                Ok(token) => Ok(Some(token.into_session(email))),
                Err(_) if path == SIGNUP_URL && serde_json::from_str::<AuthUser>(&body).is_ok() => Ok(None),
                Err(e) => Err(TaskError::request(e)),
            }
        }
        StatusCode::BAD_REQUEST if path == TOKEN_URL => Err(TaskError::Auth(Message::WrongCredentials)),
        StatusCode::UNPROCESSABLE_ENTITY if path == SIGNUP_URL => {
            Err(TaskError::Validation(Message::EmailAlreadyRegistered(email.to_string())))
        }
        _ => Err(error_for(res).await),
    }
}

/// PostgREST rows of a `return=representation` response.
async fn rows(res: Response) -> TaskResult<Vec<Task>> {
    if !res.status().is_success() {
        return Err(error_for(res).await);
    }
    Ok(res.json::<Vec<Task>>().await?)
}

/// Rows a PATCH or DELETE touched. Rows hidden by row-level security are
/// simply absent from the representation, so they count as 0.
async fn affected(res: Response) -> TaskResult<usize> {
    Ok(rows(res).await?.len())
}

pub struct SupabaseAuth {
    client: Client,
    config: SupabaseConfig,
    session_file: SessionFile,
    context: SessionContext,
}

impl SupabaseAuth {
    pub fn new(config: &SupabaseConfig, storage: &DataStorage) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            config: config.clone(),
            session_file: SessionFile::new(storage, SESSION_FILE)?,
            context: SessionContext::new(),
        })
    }

    async fn request_session(&self, path: &str, email: &str, password: &str) -> TaskResult<Option<Session>> {
        let res = self
            .client
            .post(self.config.endpoint(path))
            .header(APIKEY_HEADER, &self.config.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;

        session_from(res, path, email).await
    }

    fn store_session(&self, session: &Session) -> TaskResult<()> {
        self.session_file.write(session).map_err(TaskError::request)?;
        self.context.publish(Some(session));
        Ok(())
    }

    fn discard_session(&self) {
        if let Err(e) = self.session_file.delete() {
            tracing::warn!(error = %e, "failed to remove session file");
        }
        self.context.publish(None);
    }
}

impl AuthProvider for SupabaseAuth {
    fn context(&self) -> &SessionContext {
        &self.context
    }

    async fn get_current_session(&self) -> TaskResult<Option<Session>> {
        match self.session_file.read() {
            Some(session) if session.is_expired() => {
                tracing::debug!(user = %session.user.id, "cached session expired");
                self.discard_session();
                Ok(None)
            }
            session => Ok(session),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> TaskResult<Session> {
        let session = self
            .request_session(TOKEN_URL, email, password)
            .await?
            .ok_or_else(|| TaskError::request("token response carried no session"))?;
        tracing::info!(user = %session.user.id, "signed in");
        self.store_session(&session)?;
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> TaskResult<Option<Session>> {
        let session = self.request_session(SIGNUP_URL, email, password).await?;
        match &session {
            Some(session) => self.store_session(session)?,
            None => tracing::info!("sign-up awaits e-mail confirmation"),
        }
        Ok(session)
    }

    async fn sign_out(&self) -> TaskResult<()> {
        if let Some(session) = self.session_file.read() {
            let res = self
                .client
                .post(self.config.endpoint(LOGOUT_URL))
                .header(APIKEY_HEADER, &self.config.anon_key)
                .bearer_auth(&session.access_token)
                .send()
                .await;
            if let Err(e) = res {
                tracing::warn!(error = %e, "logout request failed, dropping local session anyway");
            }
        }
        self.discard_session();
        Ok(())
    }
}

#[derive(Serialize)]
struct TaskInsert<'a> {
    user_id: Uuid,
    description: &'a str,
    due_date: chrono::NaiveDate,
}

#[derive(Serialize)]
struct CompletionPatch {
    completed: bool,
}

pub struct SupabaseTasks {
    client: Client,
    config: SupabaseConfig,
}

impl SupabaseTasks {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    fn authorized(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        builder
            .header(APIKEY_HEADER, &self.config.anon_key)
            .bearer_auth(&session.access_token)
    }

    fn by_id(&self, id: Uuid) -> String {
        format!("{}?id=eq.{}", self.config.endpoint(TASKS_URL), id)
    }
}

impl TaskBackend for SupabaseTasks {
    async fn list_tasks(&self, session: &Session) -> TaskResult<Vec<Task>> {
        let url = format!("{}?select=*&order=due_date.asc", self.config.endpoint(TASKS_URL));
        let res = self.authorized(self.client.get(url), session).send().await?;
        rows(res).await
    }

    async fn create_task(&self, session: &Session, new_task: &NewTask) -> TaskResult<Task> {
        let body = TaskInsert {
            user_id: session.user.id,
            description: &new_task.description,
            due_date: new_task.due_date,
        };
        let res = self
            .authorized(self.client.post(self.config.endpoint(TASKS_URL)), session)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&body)
            .send()
            .await?;

        rows(res)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TaskError::request("insert returned no row"))
    }

    async fn set_completion(&self, session: &Session, id: Uuid, completed: bool) -> TaskResult<usize> {
        let res = self
            .authorized(self.client.patch(self.by_id(id)), session)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&CompletionPatch { completed })
            .send()
            .await?;
        affected(res).await
    }

    async fn delete_task(&self, session: &Session, id: Uuid) -> TaskResult<usize> {
        let res = self
            .authorized(self.client.delete(self.by_id(id)), session)
            .header("Prefer", RETURN_REPRESENTATION)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        affected(res).await
    }
}
