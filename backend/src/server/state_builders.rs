//! Builders for HTTP state ports and repository-backed service pairs.

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;
use mockable::{Clock, DefaultClock};

use opsdesk::domain::ports::{
    ExpenseCommand, ExpenseQuery, FixtureExpenseCommand, FixtureExpenseQuery,
    FixtureInvitationCommand, FixtureInvitationQuery, FixtureLoginService,
    FixtureNotificationCommand, FixtureNotificationQuery, FixtureProjectCommand,
    FixtureProjectQuery, FixtureStatsQuery, FixtureVendorBillCommand, FixtureVendorBillQuery,
    InvitationCommand, InvitationQuery, LoginService, NotificationCommand, NotificationQuery,
    ProjectCommand, ProjectQuery, StatsQuery, VendorBillCommand, VendorBillQuery,
};
use opsdesk::domain::{
    ExpenseService, InvitationService, NotificationService, PasswordLoginService,
    ProjectService, StatsService, VendorBillService,
};
use opsdesk::inbound::http::state::HttpState;
use opsdesk::outbound::persistence::{
    DbPool, DieselExpenseRepository, DieselInvitationRepository, DieselNotificationRepository,
    DieselOrganizationRepository, DieselProjectRepository, DieselStatsRepository,
    DieselUserRepository, DieselVendorBillRepository,
};

use super::ServerConfig;

/// Build a command/query service pair using real services when a pool is
/// available, otherwise using fixture implementations.
fn build_service_pair<Pool, S, Cmd, Query, MakeService, Cast>(
    pool: &Option<Pool>,
    make_service: MakeService,
    fixtures: (Arc<Cmd>, Arc<Query>),
    cast: Cast,
) -> (Arc<Cmd>, Arc<Query>)
where
    S: 'static,
    Cmd: ?Sized + 'static,
    Query: ?Sized + 'static,
    MakeService: FnOnce(&Pool) -> S,
    Cast: FnOnce(Arc<S>) -> (Arc<Cmd>, Arc<Query>),
{
    match pool {
        Some(pool) => {
            let service = Arc::new(make_service(pool));
            cast(service)
        }
        None => fixtures,
    }
}

macro_rules! build_pair {
    ($fn_name:ident, $cmd_trait:ident, $query_trait:ident, $fixture_cmd:path, $fixture_query:path) => {
        fn $fn_name<Pool, S>(
            pool: &Option<Pool>,
            make_service: impl FnOnce(&Pool) -> S,
        ) -> (Arc<dyn $cmd_trait>, Arc<dyn $query_trait>)
        where
            S: $cmd_trait + $query_trait + 'static,
        {
            build_service_pair(
                pool,
                make_service,
                (
                    Arc::new($fixture_cmd) as Arc<dyn $cmd_trait>,
                    Arc::new($fixture_query) as Arc<dyn $query_trait>,
                ),
                |service| {
                    (
                        service.clone() as Arc<dyn $cmd_trait>,
                        service as Arc<dyn $query_trait>,
                    )
                },
            )
        }
    };
}

build_pair!(
    expenses_pair,
    ExpenseCommand,
    ExpenseQuery,
    FixtureExpenseCommand,
    FixtureExpenseQuery
);
build_pair!(
    vendor_bills_pair,
    VendorBillCommand,
    VendorBillQuery,
    FixtureVendorBillCommand,
    FixtureVendorBillQuery
);
build_pair!(
    invitations_pair,
    InvitationCommand,
    InvitationQuery,
    FixtureInvitationCommand,
    FixtureInvitationQuery
);
build_pair!(
    notifications_pair,
    NotificationCommand,
    NotificationQuery,
    FixtureNotificationCommand,
    FixtureNotificationQuery
);
build_pair!(
    projects_pair,
    ProjectCommand,
    ProjectQuery,
    FixtureProjectCommand,
    FixtureProjectQuery
);

/// Pool-backed repositories shared by every service.
struct SharedRepositories {
    pool: DbPool,
    organizations: Arc<DieselOrganizationRepository>,
    users: Arc<DieselUserRepository>,
    notifications: Arc<NotificationService<DieselNotificationRepository>>,
    clock: Arc<dyn Clock>,
}

impl SharedRepositories {
    fn new(pool: &DbPool) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        Self {
            pool: pool.clone(),
            organizations: Arc::new(DieselOrganizationRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            notifications: Arc::new(NotificationService::new(
                Arc::new(DieselNotificationRepository::new(pool.clone())),
                clock.clone(),
            )),
            clock,
        }
    }
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let shared = config.db_pool.as_ref().map(SharedRepositories::new);
    let ttl: Duration = config.invitation_ttl;

    let login: Arc<dyn LoginService> = match &shared {
        Some(shared) => Arc::new(PasswordLoginService::new(shared.users.clone())),
        None => Arc::new(FixtureLoginService),
    };
    let (expenses, expenses_query) = expenses_pair(&shared, |shared| {
        ExpenseService::new(
            Arc::new(DieselExpenseRepository::new(shared.pool.clone())),
            shared.organizations.clone(),
            shared.notifications.clone(),
            shared.clock.clone(),
        )
    });
    let (vendor_bills, vendor_bills_query) = vendor_bills_pair(&shared, |shared| {
        VendorBillService::new(
            Arc::new(DieselVendorBillRepository::new(shared.pool.clone())),
            shared.organizations.clone(),
            shared.clock.clone(),
        )
    });
    let (invitations, invitations_query) = invitations_pair(&shared, |shared| {
        InvitationService::new(
            Arc::new(DieselInvitationRepository::new(shared.pool.clone())),
            shared.organizations.clone(),
            shared.users.clone(),
            ttl,
            shared.clock.clone(),
        )
    });
    let (notifications, notifications_query) =
        notifications_pair(&shared, |shared| shared.notifications.as_ref().clone());
    let (projects, projects_query) = projects_pair(&shared, |shared| {
        ProjectService::new(
            Arc::new(DieselProjectRepository::new(shared.pool.clone())),
            shared.organizations.clone(),
            shared.clock.clone(),
        )
    });
    let stats: Arc<dyn StatsQuery> = match &shared {
        Some(shared) => Arc::new(StatsService::new(
            Arc::new(DieselStatsRepository::new(shared.pool.clone())),
            shared.organizations.clone(),
        )),
        None => Arc::new(FixtureStatsQuery),
    };

    web::Data::new(HttpState {
        login,
        expenses,
        expenses_query,
        vendor_bills,
        vendor_bills_query,
        invitations,
        invitations_query,
        notifications,
        notifications_query,
        projects,
        projects_query,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use opsdesk::domain::ports::{FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_PASSWORD, FIXTURE_LOGIN_USER_ID};
    use opsdesk::domain::{
        Error, LoginCredentials, Notification, NotificationId, NotificationLimit, UserId,
    };
    use rstest::rstest;

    const MARKED_BY_STUB: u64 = 42;

    struct StubNotifications;

    #[async_trait]
    impl NotificationCommand for StubNotifications {
        async fn mark_read(
            &self,
            _user_id: &UserId,
            _notification_id: &NotificationId,
        ) -> Result<(), Error> {
            Ok(())
        }

        async fn mark_all_read(&self, _user_id: &UserId) -> Result<u64, Error> {
            Ok(MARKED_BY_STUB)
        }
    }

    #[async_trait]
    impl NotificationQuery for StubNotifications {
        async fn unread_count(&self, _user_id: &UserId) -> Result<i64, Error> {
            Ok(3)
        }

        async fn list(
            &self,
            _user_id: &UserId,
            _unread_only: bool,
            _limit: NotificationLimit,
        ) -> Result<Vec<Notification>, Error> {
            Ok(Vec::new())
        }
    }

    #[rstest]
    #[tokio::test]
    async fn pool_present_selects_the_built_service() {
        let (command, query) = notifications_pair(&Some(()), |_| StubNotifications);
        let user = UserId::random();

        assert_eq!(
            command.mark_all_read(&user).await.expect("stub marks"),
            MARKED_BY_STUB
        );
        assert_eq!(query.unread_count(&user).await.expect("stub counts"), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn pool_absent_keeps_fixtures() {
        let (command, query) =
            notifications_pair::<(), StubNotifications>(&None, |_| StubNotifications);
        let user = UserId::random();

        assert_eq!(command.mark_all_read(&user).await.expect("fixture marks"), 0);
        assert_eq!(query.unread_count(&user).await.expect("fixture counts"), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_state_accepts_fixture_login_without_a_pool() {
        let config = ServerConfig::new(
            actix_web::cookie::Key::generate(),
            false,
            actix_web::cookie::SameSite::Lax,
            "127.0.0.1:0".parse().expect("valid addr"),
        );
        let state = build_http_state(&config);
        let credentials =
            LoginCredentials::try_from_parts(FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_PASSWORD)
                .expect("fixture credentials shape");

        let user = state
            .login
            .authenticate(&credentials)
            .await
            .expect("fixture login succeeds");
        assert_eq!(user.to_string(), FIXTURE_LOGIN_USER_ID);
    }
}
