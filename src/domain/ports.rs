//! Domain Ports - API server access used by the node utilities
//!
//! Only cluster-scoped reads are needed: MachineConfigPools, MachineConfigs
//! and KubeletConfigs all live outside namespaces.

use async_trait::async_trait;
use kube::api::{Api, ListParams};
use kube::{Client, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A cluster-scoped resource type that can be fetched by name
pub trait ClusterResource:
    Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug + Send + Sync + 'static
{
}

impl<K> ClusterResource for K where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug + Send + Sync + 'static
{
}

// =============================================================================
// Resource Getter Port
// =============================================================================

/// Port for reading cluster-scoped resources
///
/// Errors are the client's own; callers add context.
#[async_trait]
pub trait ResourceGetter: Send + Sync {
    /// Fetch a single resource by name
    async fn get<K>(&self, name: &str) -> Result<K, kube::Error>
    where
        K: ClusterResource;

    /// List every resource of a kind
    async fn list<K>(&self) -> Result<Vec<K>, kube::Error>
    where
        K: ClusterResource;
}

#[async_trait]
impl ResourceGetter for Client {
    async fn get<K>(&self, name: &str) -> Result<K, kube::Error>
    where
        K: ClusterResource,
    {
        Api::<K>::all(self.clone()).get(name).await
    }

    async fn list<K>(&self) -> Result<Vec<K>, kube::Error>
    where
        K: ClusterResource,
    {
        let list = Api::<K>::all(self.clone())
            .list(&ListParams::default())
            .await?;
        Ok(list.items)
    }
}

// =============================================================================
// In-memory fake
// =============================================================================

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use kube::error::ErrorResponse;
    use serde::Serialize;
    use std::collections::BTreeMap;

    /// Stores objects as JSON keyed by (kind, name), like the API server would
    #[derive(Debug, Default)]
    pub(crate) struct FakeClient {
        objects: BTreeMap<(String, String), serde_json::Value>,
        fail_with: Option<u16>,
    }

    impl FakeClient {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn with<K>(mut self, object: &K) -> Self
        where
            K: Resource<DynamicType = ()> + Serialize,
        {
            let name = object.meta().name.clone().unwrap_or_default();
            let value = serde_json::to_value(object).unwrap();
            self.objects.insert((K::kind(&()).into_owned(), name), value);
            self
        }

        /// Make every call fail with the given HTTP status
        pub(crate) fn failing(code: u16) -> Self {
            Self {
                fail_with: Some(code),
                ..Self::default()
            }
        }
    }

    fn api_error(code: u16, message: String) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".into(),
            message,
            reason: if code == 404 { "NotFound".into() } else { "InternalError".into() },
            code,
        })
    }

    #[async_trait]
    impl ResourceGetter for FakeClient {
        async fn get<K>(&self, name: &str) -> Result<K, kube::Error>
        where
            K: ClusterResource,
        {
            if let Some(code) = self.fail_with {
                return Err(api_error(code, "injected failure".into()));
            }
            let kind = K::kind(&()).into_owned();
            match self.objects.get(&(kind.clone(), name.to_string())) {
                Some(value) => {
                    serde_json::from_value(value.clone()).map_err(kube::Error::SerdeError)
                }
                None => Err(api_error(404, format!("{} \"{}\" not found", kind, name))),
            }
        }

        async fn list<K>(&self) -> Result<Vec<K>, kube::Error>
        where
            K: ClusterResource,
        {
            if let Some(code) = self.fail_with {
                return Err(api_error(code, "injected failure".into()));
            }
            let kind = K::kind(&());
            self.objects
                .iter()
                .filter(|((k, _), _)| *k == kind)
                .map(|(_, value)| {
                    serde_json::from_value(value.clone()).map_err(kube::Error::SerdeError)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeClient;
    use super::*;
    use crate::crd::{KubeletConfig, KubeletConfigSpec, MachineConfig, MachineConfigSpec};

    #[tokio::test]
    async fn test_fake_get_and_list() {
        let client = FakeClient::new()
            .with(&KubeletConfig::new("set-max-pods", KubeletConfigSpec::default()))
            .with(&MachineConfig::new("00-worker", MachineConfigSpec::default()));

        let kc: KubeletConfig = client.get("set-max-pods").await.unwrap();
        assert_eq!(kc.metadata.name.as_deref(), Some("set-max-pods"));

        let missing = client.get::<KubeletConfig>("00-worker").await;
        assert!(matches!(missing, Err(kube::Error::Api(ref e)) if e.code == 404));

        let mcs: Vec<MachineConfig> = client.list().await.unwrap();
        assert_eq!(mcs.len(), 1);
    }

    #[tokio::test]
    async fn test_fake_failing() {
        let client = FakeClient::failing(503);
        let result = client.get::<KubeletConfig>("anything").await;
        assert!(matches!(result, Err(kube::Error::Api(ref e)) if e.code == 503));
    }
}
