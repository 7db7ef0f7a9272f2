use boscocare_core::Role;
use serde::Serialize;
use utoipa::ToSchema;

/// A home screen card. Only the section whose role matches the caller's is
/// accessible.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HomeSection {
    #[schema(example = "guidance")]
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub route: &'static str,
    pub accessible: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HomeResponse {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub sections: Vec<HomeSection>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HubLink {
    pub title: &'static str,
    pub description: &'static str,
    pub route: &'static str,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HubResponse {
    pub title: &'static str,
    pub description: &'static str,
    pub links: Vec<HubLink>,
}

pub(crate) struct SectionDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub route: &'static str,
    pub role: Role,
}

pub(crate) const SECTIONS: [SectionDef; 3] = [
    SectionDef {
        id: "guidance",
        title: "Guidance",
        description: "Manage guidance activities and schedules",
        route: "/guidance",
        role: Role::Guidance,
    },
    SectionDef {
        id: "pastoral",
        title: "Pastoral",
        description: "Manage pastoral activities and sacraments",
        route: "/pastoral",
        role: Role::Pastoral,
    },
    SectionDef {
        id: "student-records",
        title: "Student Records",
        description: "Manage student information",
        route: "/student-records",
        role: Role::Student,
    },
];

impl HomeResponse {
    pub fn for_role(email: Option<String>, role: Option<Role>) -> Self {
        let sections = SECTIONS
            .iter()
            .map(|section| HomeSection {
                id: section.id,
                title: section.title,
                description: section.description,
                route: section.route,
                accessible: role == Some(section.role),
            })
            .collect();

        Self {
            email,
            role,
            sections,
        }
    }
}

impl HubResponse {
    pub fn guidance() -> Self {
        Self {
            title: "Guidance Management",
            description: "Manage guidance activities and schedules",
            links: vec![
                HubLink {
                    title: "Activity Schedule",
                    description: "Create and manage upcoming guidance activities",
                    route: "/guidance/activity-schedule",
                },
                HubLink {
                    title: "Schedule History",
                    description: "View and manage completed activities",
                    route: "/guidance/schedule-history",
                },
            ],
        }
    }

    pub fn pastoral() -> Self {
        Self {
            title: "Pastoral Management",
            description: "Manage pastoral activities and sacrament documents",
            links: vec![
                HubLink {
                    title: "Activities Management",
                    description: "Create and manage pastoral activities",
                    route: "/pastoral/activities",
                },
                HubLink {
                    title: "Sacrament Documents",
                    description: "Manage sacrament records and documents",
                    route: "/pastoral/sacraments",
                },
            ],
        }
    }
}
