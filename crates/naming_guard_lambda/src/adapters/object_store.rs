/// Minimal object-store surface the validator needs. Calls are blocking and
/// issued one at a time within an invocation.
pub trait ObjectStore {
    fn object_exists(&self, bucket: &str, key: &str) -> Result<bool, String>;

    /// Overwrites any object already present at `target_key`.
    fn copy_object(&self, bucket: &str, source_key: &str, target_key: &str) -> Result<(), String>;

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), String>;
}
