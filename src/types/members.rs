use crate::types::{ClassDescription, ElementRef};

/// Handle to a field declared on a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldDescription {
    pub parent: ClassDescription,
    pub(crate) index: u32,
}

/// Handle to a method declared on a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MethodDescription {
    pub parent: ClassDescription,
    pub(crate) index: u32,
}

/// A member that can back a property: either a field or an accessor method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberDescription {
    Field(FieldDescription),
    Method(MethodDescription),
}

impl MemberDescription {
    pub fn parent(&self) -> ClassDescription {
        match self {
            MemberDescription::Field(f) => f.parent,
            MemberDescription::Method(m) => m.parent,
        }
    }

    pub fn element_ref(&self) -> ElementRef {
        match self {
            MemberDescription::Field(f) => ElementRef::Field(*f),
            MemberDescription::Method(m) => ElementRef::Method(*m),
        }
    }
}

impl From<FieldDescription> for MemberDescription {
    fn from(f: FieldDescription) -> Self {
        MemberDescription::Field(f)
    }
}

impl From<MethodDescription> for MemberDescription {
    fn from(m: MethodDescription) -> Self {
        MemberDescription::Method(m)
    }
}
