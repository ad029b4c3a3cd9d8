use uuid::Uuid;

/// Deterministic UUIDv5 from an arbitrary string id
pub fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

/// Point id for a policy chunk: UUIDv5 of `doc_id:policy_version:chunk_id`.
///
/// The same triple always yields the same id, so re-ingesting a chunk
/// overwrites the stored point instead of adding a second one.
pub fn chunk_point_id(doc_id: &str, policy_version: &str, chunk_id: u32) -> Uuid {
    stable_uuid(&format!("{doc_id}:{policy_version}:{chunk_id}"))
}
