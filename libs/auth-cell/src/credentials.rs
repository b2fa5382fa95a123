use shared_models::auth::Role;

/// Hardcoded demo credential list. There is no authentication backend;
/// doctor and patient entries use the email of their seeded directory
/// record so the minted token's subject is the real record id.
#[derive(Debug, Clone, Copy)]
pub struct DemoCredential {
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub role: Role,
}

pub const DEMO_CREDENTIALS: &[DemoCredential] = &[
    DemoCredential {
        email: "admin@hospital.com",
        password: "admin123",
        name: "Admin User",
        role: Role::Admin,
    },
    DemoCredential {
        email: "john.smith@hospital.com",
        password: "doctor123",
        name: "Dr. John Smith",
        role: Role::Doctor,
    },
    DemoCredential {
        email: "john.doe@example.com",
        password: "patient123",
        name: "John Doe",
        role: Role::Patient,
    },
];

pub fn verify(email: &str, password: &str) -> Option<&'static DemoCredential> {
    DEMO_CREDENTIALS
        .iter()
        .find(|c| c.email == email && c.password == password)
}
