use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i32);
    };
}

id_newtype!(ScopeId);
id_newtype!(TagId);
id_newtype!(DocId);
id_newtype!(SeqId);

/// Conversion format code. The backend's catalog assigns one per output
/// format; `CType(0)` is the publish/source slot and is never requestable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CType(pub i32);

/// Opaque handle to a stored artifact on the backend's object store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub id: ScopeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub id: SeqId,
    pub title: String,
    #[serde(default)]
    pub scope_ids: Vec<ScopeId>,
}
