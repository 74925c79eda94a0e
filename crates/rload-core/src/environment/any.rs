use super::{FsInjector, HttpInjector, InjectError, ResourceInjector};
use crate::descriptor::ResourceDescriptor;

/// Dispatches by url scheme: `http(s)://` goes to the HTTP injector, the rest to the filesystem.
#[derive(Debug, Clone)]
pub struct AnyInjector {
    pub fs: FsInjector,
    pub http: HttpInjector,
}

impl ResourceInjector for AnyInjector {
    async fn inject(&self, resource: &ResourceDescriptor) -> Result<(), InjectError> {
        if resource.url.starts_with("http://") || resource.url.starts_with("https://") {
            self.http.inject(resource).await
        } else {
            self.fs.inject(resource).await
        }
    }
}
