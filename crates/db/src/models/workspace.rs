use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workspace aggregate: owns its member entries and the list of project ids
/// (not the project bodies). Membership mutations go through the methods
/// below so the admin invariants hold; callers persist the whole document
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: Option<String>,
    pub img_key: String,
    pub img_url: Option<String>,
    #[serde(default)]
    pub projects: Vec<ObjectId>,
    pub creator_user_id: ObjectId,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub deactivated_at: Option<DateTime>,
    #[serde(default)]
    pub members: Vec<Member>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub user_id: ObjectId,
    pub role: MemberRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub joined_at: DateTime,
    pub deactivated_at: Option<DateTime>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberRole {
    Admin,
    Member,
}

#[derive(Debug, Error, PartialEq)]
pub enum MembershipError {
    #[error("Member not found")]
    MemberNotFound,
    #[error("Cannot deactivate the last admin. Please assign another admin first.")]
    LastAdmin,
}

/// What `exit_member` did to the surrounding workspace.
#[derive(Debug, PartialEq)]
pub struct WorkspaceExit {
    pub workspace_deactivated: bool,
}

/// Per-member result of an add/reactivate pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMemberOutcome {
    Added,
    Reactivated,
    AlreadyActive,
}

impl Workspace {
    pub const COLLECTION: &'static str = "workspaces";

    pub fn new(
        name: String,
        description: Option<String>,
        img_key: String,
        img_url: Option<String>,
        creator_user_id: ObjectId,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            name,
            description,
            img_key,
            img_url,
            projects: Vec::new(),
            creator_user_id,
            is_active: true,
            deactivated_at: None,
            members: vec![Member {
                user_id: creator_user_id,
                role: MemberRole::Admin,
                is_active: true,
                joined_at: now,
                deactivated_at: None,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn member(&self, user_id: ObjectId) -> Option<&Member> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    fn member_mut(&mut self, user_id: ObjectId) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.user_id == user_id)
    }

    pub fn is_active_admin(&self, user_id: ObjectId) -> bool {
        self.member(user_id)
            .is_some_and(|m| m.is_active && m.role == MemberRole::Admin)
    }

    pub fn has_active_member(&self, user_id: ObjectId) -> bool {
        self.member(user_id).is_some_and(|m| m.is_active)
    }

    pub fn active_member_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_active).count()
    }

    /// Adds a member, or flips an existing deactivated entry back to active
    /// instead of duplicating it. An already-active member is left untouched.
    pub fn add_or_reactivate_member(
        &mut self,
        user_id: ObjectId,
        role: MemberRole,
    ) -> AddMemberOutcome {
        if let Some(member) = self.member_mut(user_id) {
            if member.is_active {
                return AddMemberOutcome::AlreadyActive;
            }
            member.is_active = true;
            member.joined_at = DateTime::now();
            member.deactivated_at = None;
            return AddMemberOutcome::Reactivated;
        }

        self.members.push(Member {
            user_id,
            role,
            is_active: true,
            joined_at: DateTime::now(),
            deactivated_at: None,
        });
        AddMemberOutcome::Added
    }

    /// Soft-deactivates a member entry. Returns false if there is no entry
    /// for that user. No admin guard here; only self-exit checks admin
    /// depletion.
    pub fn deactivate_member(&mut self, user_id: ObjectId) -> bool {
        match self.member_mut(user_id) {
            Some(member) => {
                member.is_active = false;
                member.deactivated_at = Some(DateTime::now());
                true
            }
            None => false,
        }
    }

    /// Self-service exit. An admin may not leave a workspace admin-less
    /// while other members remain; the sole remaining member may always
    /// leave, which deactivates the workspace itself and frees its unique
    /// name by suffixing a timestamp.
    pub fn exit_member(&mut self, user_id: ObjectId) -> Result<WorkspaceExit, MembershipError> {
        let member = self
            .member(user_id)
            .ok_or(MembershipError::MemberNotFound)?;

        if member.role == MemberRole::Admin {
            let other_active_admins = self
                .members
                .iter()
                .filter(|m| {
                    m.role == MemberRole::Admin && m.is_active && m.user_id != user_id
                })
                .count();
            if other_active_admins == 0 && self.active_member_count() > 1 {
                return Err(MembershipError::LastAdmin);
            }
        }

        self.deactivate_member(user_id);

        if self.active_member_count() == 0 {
            self.deactivate();
            return Ok(WorkspaceExit {
                workspace_deactivated: true,
            });
        }

        Ok(WorkspaceExit {
            workspace_deactivated: false,
        })
    }

    /// Role overwrite is unconditional; demoting the last admin is allowed
    /// here even though self-exit refuses it. Returns false for an unknown
    /// member.
    pub fn set_member_role(&mut self, user_id: ObjectId, role: MemberRole) -> bool {
        match self.member_mut(user_id) {
            Some(member) => {
                member.role = role;
                true
            }
            None => false,
        }
    }

    fn deactivate(&mut self) {
        let now = DateTime::now();
        self.name = format!("{}_{}", self.name, now.timestamp_millis());
        self.is_active = false;
        self.deactivated_at = Some(now);
    }
}
