#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Staff = 2,
    Kiosk = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Staff),
            3 => Some(Role::Kiosk),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}
