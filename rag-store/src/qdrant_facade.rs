//! Thin adapter around `qdrant-client` implementing [`VectorRepository`].
//!
//! All Qdrant interactions live here so the rest of the workspace never
//! touches the builder API directly.

use std::collections::HashMap;
use std::time::Duration;

use futures::future::BoxFuture;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, Filter, ListValue, PointId, PointStruct,
    SearchParamsBuilder, SearchPointsBuilder, Struct, UpsertPointsBuilder, Value as QValue,
    VectorParamsBuilder, point_id::PointIdOptions, value,
};
use tracing::{debug, info, warn};

use crate::config::{DistanceKind, RagConfig};
use crate::errors::RagError;
use crate::filters::{merge_ranked, preferred_filter, required_filter};
use crate::record::{IndexPoint, MetadataFilter, ScoredPoint};
use crate::repository::VectorRepository;

/// Qdrant-backed policy collection.
pub struct QdrantRepository {
    client: Qdrant,
    collection: String,
    vector_size: usize,
    distance: DistanceKind,
    exact: bool,
}

impl QdrantRepository {
    /// Builds the client (with API key and timeout) from `cfg`.
    ///
    /// No network call is made here.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url)
            .timeout(Duration::from_secs(cfg.timeout_secs));
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            vector_size: cfg.vector_size,
            distance: cfg.distance,
            exact: cfg.exact_search,
        })
    }

    async fn ensure(&self) -> Result<(), RagError> {
        if self.client.collection_exists(&self.collection).await? {
            debug!(collection = %self.collection, "collection already exists");
            return Ok(());
        }

        let distance = match self.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        info!(
            collection = %self.collection,
            size = self.vector_size,
            distance = ?self.distance,
            "creating collection"
        );
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(self.vector_size as u64, distance)),
            )
            .await?;
        Ok(())
    }

    async fn upsert(&self, points: Vec<IndexPoint>) -> Result<usize, RagError> {
        if points.is_empty() {
            debug!("no points provided for upsert");
            return Ok(0);
        }
        let count = points.len();
        let structs = points
            .into_iter()
            .map(to_point_struct)
            .collect::<Result<Vec<_>, _>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, structs).wait(true))
            .await?;

        info!(collection = %self.collection, points = count, "upsert completed");
        Ok(count)
    }

    async fn search_once(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<Filter>,
    ) -> Result<Vec<ScoredPoint>, RagError> {
        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);
        if let Some(f) = filter {
            builder = builder.filter(f);
        }
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self.client.search_points(builder).await?;
        Ok(res
            .result
            .into_iter()
            .map(|p| ScoredPoint {
                id: point_id_to_string(p.id.as_ref()),
                score: p.score,
                payload: qpayload_to_json(p.payload),
            })
            .collect())
    }

    async fn search_filtered(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredPoint>, RagError> {
        let Some(filter) = filter.filter(|f| !f.is_empty()) else {
            return self.search_once(vector, top_k, None).await;
        };

        let Some(preferred) = preferred_filter(filter) else {
            return self
                .search_once(vector, top_k, Some(required_filter(filter)))
                .await;
        };

        let first = self.search_once(vector.clone(), top_k, Some(preferred)).await?;
        if first.len() as u64 >= top_k {
            return Ok(first);
        }

        debug!(
            preferred_hits = first.len(),
            top_k, "preference under-filled, widening to required conditions"
        );
        let fallback = self
            .search_once(vector, top_k, Some(required_filter(filter)))
            .await?;
        Ok(merge_ranked(first, fallback, top_k as usize))
    }
}

impl VectorRepository for QdrantRepository {
    fn ensure_collection(&self) -> BoxFuture<'_, Result<(), RagError>> {
        Box::pin(self.ensure())
    }

    fn upsert_points(&self, points: Vec<IndexPoint>) -> BoxFuture<'_, Result<usize, RagError>> {
        Box::pin(self.upsert(points))
    }

    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&'a MetadataFilter>,
    ) -> BoxFuture<'a, Result<Vec<ScoredPoint>, RagError>> {
        Box::pin(async move {
            if vector.len() != self.vector_size {
                warn!(
                    got = vector.len(),
                    want = self.vector_size,
                    "query vector has wrong dimension"
                );
                return Err(RagError::VectorSizeMismatch {
                    got: vector.len(),
                    want: self.vector_size,
                });
            }
            self.search_filtered(vector, top_k, filter).await
        })
    }
}

fn to_point_struct(p: IndexPoint) -> Result<PointStruct, RagError> {
    let payload = match serde_json::to_value(&p.payload)? {
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| (k, json_to_qvalue(v)))
            .collect::<HashMap<_, _>>(),
        _ => HashMap::new(),
    };
    let pid: PointId = p.id.into();
    Ok(PointStruct {
        id: Some(pid),
        payload,
        vectors: Some(p.vector.into()),
        ..Default::default()
    })
}

fn point_id_to_string(id: Option<&PointId>) -> String {
    match id.and_then(|pid| pid.point_id_options.as_ref()) {
        Some(PointIdOptions::Uuid(u)) => u.clone(),
        Some(PointIdOptions::Num(n)) => n.to_string(),
        None => String::new(),
    }
}

/// Converts `serde_json::Value` into Qdrant `Value` (handles arrays/objects).
fn json_to_qvalue(v: serde_json::Value) -> QValue {
    use value::Kind as K;
    let kind = match v {
        serde_json::Value::String(s) => Some(K::StringValue(s)),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(K::IntegerValue(i)),
            (None, Some(f)) => Some(K::DoubleValue(f)),
            _ => Some(K::StringValue(n.to_string())),
        },
        serde_json::Value::Bool(b) => Some(K::BoolValue(b)),
        serde_json::Value::Array(arr) => Some(K::ListValue(ListValue {
            values: arr.into_iter().map(json_to_qvalue).collect(),
        })),
        serde_json::Value::Object(map) => Some(K::StructValue(Struct {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, json_to_qvalue(v)))
                .collect(),
        })),
        serde_json::Value::Null => None,
    };
    QValue { kind }
}

fn qvalue_to_json(v: QValue) -> serde_json::Value {
    use value::Kind as K;
    match v.kind {
        Some(K::StringValue(s)) => serde_json::Value::String(s),
        Some(K::IntegerValue(i)) => serde_json::Value::from(i),
        Some(K::DoubleValue(f)) => serde_json::json!(f),
        Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(K::ListValue(l)) => {
            serde_json::Value::Array(l.values.into_iter().map(qvalue_to_json).collect())
        }
        Some(K::StructValue(s)) => qpayload_to_json(s.fields),
        Some(K::NullValue(_)) | None => serde_json::Value::Null,
    }
}

/// Converts a Qdrant payload into a JSON object.
fn qpayload_to_json(p: HashMap<String, QValue>) -> serde_json::Value {
    serde_json::Value::Object(
        p.into_iter()
            .map(|(k, v)| (k, qvalue_to_json(v)))
            .collect(),
    )
}
