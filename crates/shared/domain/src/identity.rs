//! The admin identity aggregate.
//!
//! An administrator is stored as one account record plus one membership
//! record per university, linked by email. Every mutation goes through
//! [`AdminIdentity`], which edits both sides in memory and reports what has
//! to be written back as a [`SyncPlan`]. Callers persist the plan in a
//! single transaction.

use chrono::{DateTime, Utc};

use crate::admin::{AdminAccount, AdminRole};
use crate::constants::UNIVERSITY_UNKNOWN;
use crate::membership::{Membership, MembershipStatus};
use crate::password::Password;
use crate::record_id::RecordId;
use crate::view::{AdminView, CreatedAdmin};

/// Data for a brand new university admin.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    /// Already normalized
    pub email: String,
    pub password: Password,
    pub university: String,
    pub status: MembershipStatus,
}

/// Partial update of an admin. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct AdminChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<Password>,
    /// University the update is scoped to
    pub university: Option<String>,
    pub status: Option<MembershipStatus>,
    pub role: Option<AdminRole>,
}

/// Records touched by a mutation of an [`AdminIdentity`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub account_changed: bool,
    pub created: Vec<RecordId>,
    pub updated: Vec<RecordId>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        !self.account_changed && self.created.is_empty() && self.updated.is_empty()
    }

    fn touch(&mut self, id: &RecordId) {
        if !self.updated.contains(id) && !self.created.contains(id) {
            self.updated.push(id.clone());
        }
    }
}

/// An account together with every membership sharing its email,
/// ordered by creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub account: AdminAccount,
    pub memberships: Vec<Membership>,
}

impl AdminIdentity {
    pub fn new(account: AdminAccount, mut memberships: Vec<Membership>) -> Self {
        memberships.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Self {
            account,
            memberships,
        }
    }

    /// Build the account for a new university admin.
    ///
    /// The admin must change the password on first login. No membership is
    /// created; the university is only recorded as the home university.
    pub fn enroll(new: NewAdmin, now: DateTime<Utc>) -> Self {
        let account = AdminAccount {
            id: RecordId::generate(),
            name: new.name,
            email: new.email,
            password_hash: new.password.into_string(),
            role: AdminRole::Admin,
            university: Some(new.university),
            is_active: new.status == MembershipStatus::Active,
            require_password_change: true,
            failed_login_attempts: 0,
            last_password_change: Some(now),
            created_at: now,
            updated_at: now,
        };
        Self::new(account, Vec::new())
    }

    /// Build the first platform administrator. Not tied to any university
    /// and not forced to change the password.
    pub fn bootstrap(name: String, email: String, password: Password, now: DateTime<Utc>) -> Self {
        let account = AdminAccount {
            id: RecordId::generate(),
            name,
            email,
            password_hash: password.into_string(),
            role: AdminRole::SuperAdmin,
            university: None,
            is_active: true,
            require_password_change: false,
            failed_login_attempts: 0,
            last_password_change: Some(now),
            created_at: now,
            updated_at: now,
        };
        Self::new(account, Vec::new())
    }

    pub fn id(&self) -> &RecordId {
        &self.account.id
    }

    pub fn email(&self) -> &str {
        &self.account.email
    }

    pub fn membership_for(&self, university: &str) -> Option<&Membership> {
        self.memberships.iter().find(|m| m.university == university)
    }

    /// Earliest membership, ties broken by id
    pub fn primary_membership(&self) -> Option<&Membership> {
        self.memberships.first()
    }

    /// Tied to `university` through the home university or a membership
    pub fn belongs_to(&self, university: &str) -> bool {
        self.account.is_home_university(university) || self.membership_for(university).is_some()
    }

    /// Apply a partial update to the account and reconcile memberships.
    ///
    /// Email uniqueness against other accounts must be checked by the caller
    /// before applying.
    pub fn apply(&mut self, changes: AdminChanges, now: DateTime<Utc>) -> SyncPlan {
        let original_email = self.account.email.clone();
        let mut plan = SyncPlan {
            account_changed: self.apply_to_account(&changes, now),
            ..SyncPlan::default()
        };
        let email_changed = self.account.email != original_email;

        match changes.university.as_deref() {
            Some(target) => {
                self.sync_target(target, &changes, now, &mut plan);

                if email_changed {
                    let email = self.account.email.clone();
                    let name = self.account.name.clone();
                    for link in self.memberships.iter_mut().filter(|m| m.university != target) {
                        link.email = email.clone();
                        link.name = name.clone();
                        link.updated_at = now;
                        plan.touch(&link.id);
                    }
                }
            }
            None => {
                if email_changed {
                    let email = self.account.email.clone();
                    let name = self.account.name.clone();
                    for link in self.memberships.iter_mut() {
                        link.email = email.clone();
                        link.name = name.clone();
                        link.updated_at = now;
                        plan.touch(&link.id);
                    }
                } else if let Some(name) = &changes.name {
                    for link in self.memberships.iter_mut() {
                        link.name = name.clone();
                        link.updated_at = now;
                        plan.touch(&link.id);
                    }
                }
            }
        }

        plan
    }

    /// Replace the password everywhere and clear the forced-change flag.
    pub fn change_password(&mut self, password: Password, now: DateTime<Utc>) -> SyncPlan {
        let hash = password.into_string();
        self.account.password_hash = hash.clone();
        self.account.require_password_change = false;
        self.account.last_password_change = Some(now);
        self.account.updated_at = now;

        let mut plan = SyncPlan {
            account_changed: true,
            ..SyncPlan::default()
        };
        for link in self.memberships.iter_mut() {
            link.password_hash = hash.clone();
            link.updated_at = now;
            plan.touch(&link.id);
        }
        plan
    }

    /// Merged view scoped to `university`, or to the primary membership.
    pub fn view(&self, university: Option<&str>) -> AdminView {
        let link = match university {
            Some(university) => self.membership_for(university),
            None => self.primary_membership(),
        };
        let account = &self.account;

        AdminView {
            id: account.id.to_string(),
            name: link.map_or_else(|| account.name.clone(), |m| m.name.clone()),
            email: account.email.clone(),
            role: account.role.to_string(),
            university: link
                .map(|m| m.university.as_str())
                .or(university)
                .unwrap_or(UNIVERSITY_UNKNOWN)
                .to_string(),
            status: link.map_or_else(|| account.fallback_status(), |m| m.status),
            created_at: link.map_or(account.created_at, |m| m.created_at),
            updated_at: link.map_or(account.updated_at, |m| m.updated_at),
            require_password_change: account.require_password_change,
        }
    }

    /// Creation response echoing the requested university and status.
    pub fn created(&self, status: MembershipStatus) -> CreatedAdmin {
        let account = &self.account;
        CreatedAdmin {
            id: account.id.to_string(),
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role.to_string(),
            university: account
                .university
                .clone()
                .unwrap_or_else(|| UNIVERSITY_UNKNOWN.to_string()),
            status,
            is_active: account.is_active,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }

    fn apply_to_account(&mut self, changes: &AdminChanges, now: DateTime<Utc>) -> bool {
        let account = &mut self.account;
        let mut changed = false;

        if let Some(name) = changes.name.as_ref().filter(|n| **n != account.name) {
            account.name = name.clone();
            changed = true;
        }
        if let Some(email) = changes.email.as_ref().filter(|e| **e != account.email) {
            account.email = email.clone();
            changed = true;
        }
        if let Some(role) = changes.role.as_ref().filter(|r| **r != account.role) {
            account.role = role.clone();
            changed = true;
        }
        if let Some(password) = &changes.password {
            account.password_hash = password.as_str().to_string();
            account.require_password_change = false;
            account.last_password_change = Some(now);
            changed = true;
        }

        if changed {
            account.updated_at = now;
        }
        changed
    }

    fn sync_target(
        &mut self,
        target: &str,
        changes: &AdminChanges,
        now: DateTime<Utc>,
        plan: &mut SyncPlan,
    ) {
        let account = &self.account;

        match self.memberships.iter().position(|m| m.university == target) {
            Some(index) => {
                let link = &mut self.memberships[index];
                let mut dirty = false;
                if let Some(name) = changes.name.as_ref().filter(|n| **n != link.name) {
                    link.name = name.clone();
                    dirty = true;
                }
                if changes.email.is_some() && link.email != account.email {
                    link.email = account.email.clone();
                    dirty = true;
                }
                if let Some(status) = changes.status.filter(|s| *s != link.status) {
                    link.status = status;
                    dirty = true;
                }
                if let Some(role) = changes.role.as_ref().filter(|r| r.as_str() != link.role) {
                    link.role = role.to_string();
                    dirty = true;
                }
                if changes.password.is_some() && link.password_hash != account.password_hash {
                    link.password_hash = account.password_hash.clone();
                    dirty = true;
                }

                if dirty {
                    link.updated_at = now;
                    plan.touch(&link.id);
                }
            }
            None => {
                let link = Membership {
                    id: RecordId::generate(),
                    name: account.name.clone(),
                    email: account.email.clone(),
                    password_hash: account.password_hash.clone(),
                    role: account.role.to_string(),
                    university: target.to_string(),
                    status: changes.status.unwrap_or(MembershipStatus::Pending),
                    created_at: now,
                    updated_at: now,
                };
                plan.created.push(link.id.clone());
                self.memberships.push(link);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const WOLDIA: &str = "Woldia University";
    const BAHIR_DAR: &str = "Bahir Dar University";

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn enrolled() -> AdminIdentity {
        AdminIdentity::enroll(
            NewAdmin {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                password: Password::from_hash("hash-1"),
                university: WOLDIA.to_string(),
                status: MembershipStatus::Active,
            },
            now() - Duration::hours(1),
        )
    }

    fn link(identity: &AdminIdentity, university: &str, offset_minutes: i64) -> Membership {
        let at = identity.account.created_at + Duration::minutes(offset_minutes);
        Membership {
            id: RecordId::generate(),
            name: identity.account.name.clone(),
            email: identity.account.email.clone(),
            password_hash: identity.account.password_hash.clone(),
            role: identity.account.role.to_string(),
            university: university.to_string(),
            status: MembershipStatus::Active,
            created_at: at,
            updated_at: at,
        }
    }

    fn with_links(universities: &[&str]) -> AdminIdentity {
        let base = enrolled();
        let links = universities
            .iter()
            .enumerate()
            .map(|(i, u)| link(&base, u, i as i64 + 1))
            .collect();
        AdminIdentity::new(base.account, links)
    }

    #[test]
    fn enroll_creates_admin_requiring_password_change() {
        let identity = enrolled();
        assert_eq!(identity.account.role, AdminRole::Admin);
        assert!(identity.account.is_active);
        assert!(identity.account.require_password_change);
        assert_eq!(identity.account.failed_login_attempts, 0);
        assert_eq!(identity.account.university.as_deref(), Some(WOLDIA));
        assert!(identity.memberships.is_empty());
    }

    #[test]
    fn enroll_with_pending_status_is_inactive() {
        let identity = AdminIdentity::enroll(
            NewAdmin {
                name: "B".to_string(),
                email: "b@x.com".to_string(),
                password: Password::from_hash("hash"),
                university: WOLDIA.to_string(),
                status: MembershipStatus::Pending,
            },
            now(),
        );
        assert!(!identity.account.is_active);
        assert_eq!(identity.created(MembershipStatus::Pending).status, MembershipStatus::Pending);
    }

    #[test]
    fn view_without_membership_falls_back_to_account() {
        let identity = enrolled();

        let view = identity.view(None);
        assert_eq!(view.university, "N/A");
        assert_eq!(view.status, MembershipStatus::Active);
        assert_eq!(view.created_at, identity.account.created_at);
        assert!(view.require_password_change);

        let scoped = identity.view(Some(BAHIR_DAR));
        assert_eq!(scoped.university, BAHIR_DAR);
    }

    #[test]
    fn view_prefers_membership_fields() {
        let mut identity = with_links(&[WOLDIA]);
        identity.memberships[0].name = "Local Name".to_string();
        identity.memberships[0].status = MembershipStatus::Pending;

        let view = identity.view(Some(WOLDIA));
        assert_eq!(view.name, "Local Name");
        assert_eq!(view.status, MembershipStatus::Pending);
        assert_eq!(view.university, WOLDIA);
        assert_eq!(view.email, identity.account.email);
    }

    #[test]
    fn view_without_university_picks_earliest_membership() {
        let base = enrolled();
        let later = link(&base, BAHIR_DAR, 10);
        let earlier = link(&base, WOLDIA, 5);
        let identity = AdminIdentity::new(base.account, vec![later, earlier]);

        assert_eq!(identity.view(None).university, WOLDIA);
    }

    #[test]
    fn update_with_new_university_creates_pending_membership() {
        let mut identity = enrolled();
        let plan = identity.apply(
            AdminChanges {
                university: Some(WOLDIA.to_string()),
                ..AdminChanges::default()
            },
            now(),
        );

        assert!(!plan.account_changed);
        assert_eq!(plan.created.len(), 1);
        let created = identity.membership_for(WOLDIA).unwrap();
        assert_eq!(created.status, MembershipStatus::Pending);
        assert_eq!(created.password_hash, identity.account.password_hash);
        assert_eq!(created.role, "admin");
    }

    #[test]
    fn update_status_creates_membership_with_given_status_and_keeps_active_flag() {
        let mut identity = enrolled();
        let plan = identity.apply(
            AdminChanges {
                university: Some(WOLDIA.to_string()),
                status: Some(MembershipStatus::Inactive),
                ..AdminChanges::default()
            },
            now(),
        );

        assert_eq!(plan.created.len(), 1);
        assert_eq!(
            identity.membership_for(WOLDIA).unwrap().status,
            MembershipStatus::Inactive
        );
        assert!(identity.account.is_active);
    }

    #[test]
    fn update_existing_membership_syncs_fields() {
        let mut identity = with_links(&[WOLDIA]);
        let plan = identity.apply(
            AdminChanges {
                name: Some("Renamed".to_string()),
                password: Some(Password::from_hash("hash-2")),
                university: Some(WOLDIA.to_string()),
                status: Some(MembershipStatus::Inactive),
                role: Some(AdminRole::SuperAdmin),
                ..AdminChanges::default()
            },
            now(),
        );

        assert!(plan.account_changed);
        assert!(plan.created.is_empty());
        assert_eq!(plan.updated.len(), 1);

        assert!(!identity.account.require_password_change);
        let link = identity.membership_for(WOLDIA).unwrap();
        assert_eq!(link.name, "Renamed");
        assert_eq!(link.status, MembershipStatus::Inactive);
        assert_eq!(link.role, "super-admin");
        assert_eq!(link.password_hash, "hash-2");
    }

    #[test]
    fn email_change_propagates_to_other_memberships() {
        let mut identity = with_links(&[WOLDIA, BAHIR_DAR, "Gondar University"]);
        let plan = identity.apply(
            AdminChanges {
                email: Some("new@x.com".to_string()),
                university: Some(WOLDIA.to_string()),
                ..AdminChanges::default()
            },
            now(),
        );

        assert!(plan.account_changed);
        assert_eq!(plan.updated.len(), 3);
        assert!(identity.memberships.iter().all(|m| m.email == "new@x.com"));
        assert_eq!(identity.account.email, "new@x.com");
    }

    #[test]
    fn email_change_without_university_updates_every_membership() {
        let mut identity = with_links(&[WOLDIA, BAHIR_DAR]);
        identity.apply(
            AdminChanges {
                email: Some("moved@x.com".to_string()),
                name: Some("Moved".to_string()),
                ..AdminChanges::default()
            },
            now(),
        );

        for link in &identity.memberships {
            assert_eq!(link.email, "moved@x.com");
            assert_eq!(link.name, "Moved");
        }
    }

    #[test]
    fn name_change_without_university_updates_every_membership() {
        let mut identity = with_links(&[WOLDIA, BAHIR_DAR]);
        let plan = identity.apply(
            AdminChanges {
                name: Some("Only Name".to_string()),
                ..AdminChanges::default()
            },
            now(),
        );

        assert_eq!(plan.updated.len(), 2);
        assert!(identity.memberships.iter().all(|m| m.name == "Only Name"));
    }

    #[test]
    fn unchanged_values_produce_empty_plan() {
        let mut identity = with_links(&[WOLDIA]);
        let plan = identity.apply(
            AdminChanges {
                email: Some(identity.account.email.clone()),
                university: Some(WOLDIA.to_string()),
                status: Some(MembershipStatus::Active),
                ..AdminChanges::default()
            },
            now(),
        );

        assert!(plan.is_empty());
    }

    #[test]
    fn change_password_updates_account_and_memberships() {
        let mut identity = with_links(&[WOLDIA, BAHIR_DAR]);
        let plan = identity.change_password(Password::from_hash("fresh"), now());

        assert!(plan.account_changed);
        assert_eq!(plan.updated.len(), 2);
        assert!(!identity.account.require_password_change);
        assert!(identity.memberships.iter().all(|m| m.password_hash == "fresh"));
    }

    #[test]
    fn belongs_to_checks_home_and_memberships() {
        let identity = with_links(&[BAHIR_DAR]);
        assert!(identity.belongs_to(WOLDIA));
        assert!(identity.belongs_to(BAHIR_DAR));
        assert!(!identity.belongs_to("Gondar University"));
    }
}
