use serde::Deserialize;

/// One user's membership in one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTeam {
    pub user_id: String,
    pub team_id: String,
    pub team_name: String,
    pub team_role: String,
}

/// Entry of `GET /teams/{id}/members`.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamMember {
    pub user: MemberUser,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberUser {
    pub id: String,
}

impl UserTeam {
    pub fn from_member(member: TeamMember, team_id: &str, team_name: &str) -> Self {
        Self {
            user_id: member.user.id,
            team_id: team_id.to_string(),
            team_name: team_name.to_string(),
            team_role: member.role,
        }
    }

    /// Label used in the user report's `<role>_in` columns.
    pub fn label(&self) -> String {
        format!("{}, {}", self.team_name, self.team_id)
    }
}
