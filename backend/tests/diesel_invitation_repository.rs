//! Integration tests for `DieselInvitationRepository` against embedded PostgreSQL.
//!
//! Acceptance flips the invitation and inserts the membership in one
//! transaction; a second acceptance matches no pending row.

use chrono::{Duration, Utc};
use opsdesk::domain::ports::{InvitationRepository, OrganizationRepository};
use opsdesk::domain::{
    EmailAddress, Invitation, InvitationAcceptance, InvitationStatus, OrganizationId, Role,
    UserId,
};
use opsdesk::outbound::persistence::{DieselInvitationRepository, DieselOrganizationRepository};
use rstest::{fixture, rstest};

mod support;

use support::{PgContext, handle_cluster_setup_failure, setup_context};

const INVITEE: &str = "new.hire@example.com";

struct TestContext {
    pg: PgContext,
    invitations: DieselInvitationRepository,
    organizations: DieselOrganizationRepository,
    organization_id: OrganizationId,
    inviter: UserId,
    invitee: UserId,
}

impl TestContext {
    fn issue(&self, email: &str, ttl: Duration) -> Invitation {
        let invitation = Invitation::issue(
            self.organization_id,
            EmailAddress::new(email).expect("valid email"),
            Role::ProjectManager,
            self.inviter.clone(),
            Utc::now() - Duration::minutes(1),
            ttl,
        );
        self.pg
            .runtime
            .block_on(self.invitations.insert(&invitation))
            .expect("insert invitation");
        invitation
    }

    fn accept(&self, invitation: &Invitation, user_id: &UserId) -> Option<Invitation> {
        let acceptance = InvitationAcceptance {
            invitation_id: invitation.id,
            user_id: user_id.clone(),
            email: EmailAddress::new(INVITEE).expect("valid email"),
            at: Utc::now(),
        };
        self.pg
            .runtime
            .block_on(self.invitations.accept(&acceptance))
            .expect("accept query")
    }

    fn role_of(&self, user_id: &UserId) -> Option<Role> {
        self.pg
            .runtime
            .block_on(self.organizations.find_role(&self.organization_id, user_id))
            .expect("role lookup")
    }

    fn membership_count(&self) -> i64 {
        self.pg
            .seed()
            .and_then(|mut seed| seed.membership_count(&self.organization_id))
            .expect("count memberships")
    }
}

fn build_context() -> Result<TestContext, String> {
    let pg = setup_context()?;
    let mut seed = pg.seed()?;
    let organization_id = seed.organization()?;
    let inviter = seed.user("manager@example.com")?;
    let invitee = seed.user(INVITEE)?;
    seed.membership(&organization_id, &inviter, Role::Manager)?;

    Ok(TestContext {
        invitations: DieselInvitationRepository::new(pg.pool.clone()),
        organizations: DieselOrganizationRepository::new(pg.pool.clone()),
        pg,
        organization_id,
        inviter,
        invitee,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match build_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn accepting_creates_the_membership_exactly_once(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: accepting_creates_the_membership_exactly_once skipped");
        return;
    };
    let invitation = context.issue(INVITEE, Duration::days(7));

    let accepted = context
        .accept(&invitation, &context.invitee)
        .expect("pending invitation accepts");
    assert_eq!(accepted.status, InvitationStatus::Accepted);
    assert_eq!(accepted.accepted_by.as_ref(), Some(&context.invitee));
    assert_eq!(context.role_of(&context.invitee), Some(Role::ProjectManager));

    let second = context.accept(&invitation, &context.invitee);

    assert!(second.is_none(), "second accept must match no pending row");
    assert_eq!(context.membership_count(), 2);
    let stored = context
        .pg
        .runtime
        .block_on(context.invitations.find(&invitation.id))
        .expect("find invitation")
        .expect("invitation exists");
    assert_eq!(stored.status, InvitationStatus::Accepted);
    assert_eq!(stored.accepted_by.as_ref(), Some(&context.invitee));
}

#[rstest]
fn expired_invitations_are_not_accepted(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: expired_invitations_are_not_accepted skipped");
        return;
    };
    let invitation = context.issue(INVITEE, Duration::seconds(1));

    let outcome = context.accept(&invitation, &context.invitee);

    assert!(outcome.is_none());
    assert_eq!(context.role_of(&context.invitee), None);
    assert_eq!(context.membership_count(), 1);
}

#[rstest]
fn invitations_for_another_address_are_not_accepted(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: invitations_for_another_address_are_not_accepted skipped");
        return;
    };
    let invitation = context.issue("someone.else@example.com", Duration::days(7));

    let outcome = context.accept(&invitation, &context.invitee);

    assert!(outcome.is_none());
    assert_eq!(context.role_of(&context.invitee), None);
}
