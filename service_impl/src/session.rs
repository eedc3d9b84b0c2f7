use async_trait::async_trait;
use dao::session::SessionDao;
use service::{
    clock::ClockService,
    config::ConfigService,
    session::{Session, SessionService},
    uuid_service::UuidService,
    ServiceError,
};

use crate::gen_service_impl;

const SECONDS_PER_HOUR: i64 = 3600;

gen_service_impl! {
    struct SessionServiceImpl: SessionService = SessionServiceDeps {
        SessionDao: SessionDao = session_dao,
        UuidService: UuidService = uuid_service,
        ClockService: ClockService = clock_service,
        ConfigService: ConfigService = config_service
    }
}

#[async_trait]
impl<Deps: SessionServiceDeps> SessionService for SessionServiceImpl<Deps> {
    type Context = Deps::Context;

    async fn new_session_for_user(&self, user_id: &str) -> Result<Session, ServiceError> {
        let config = self.config_service.get_config().await?;
        let created = self.clock_service.unix_timestamp_now();
        let expires = SECONDS_PER_HOUR
            .checked_mul(config.session_lifetime_hours)
            .and_then(|lifetime| created.checked_add(lifetime))
            .filter(|expires| *expires > created)
            .ok_or_else(|| {
                tracing::error!(
                    "Invalid session lifetime of {} hours",
                    config.session_lifetime_hours
                );
                ServiceError::InternalError
            })?;

        let session = Session {
            id: self
                .uuid_service
                .new_uuid("session-service::new_session_for_user")
                .to_string()
                .into(),
            user_id: user_id.into(),
            expires,
            created,
        };
        self.session_dao.create(&(&session).into()).await?;
        Ok(session)
    }

    async fn invalidate_user_session(&self, id: &str) -> Result<(), ServiceError> {
        self.session_dao.delete(id).await?;
        Ok(())
    }

    async fn verify_user_session(&self, id: &str) -> Result<Option<Session>, ServiceError> {
        let now = self.clock_service.unix_timestamp_now();
        let session = self.session_dao.find_by_id(id).await?;
        Ok(session
            .map(|s| Session::from(&s))
            .filter(|session| session.expires > now))
    }
}
