use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use rag_pipeline::{
    AnswerGenerator, AskInput, ContextBuilder, ConversationMemory, DocumentMeta, FALLBACK_ANSWER,
    GenerationError, IndexingError, Indexer, Ingestor, MetadataQuery, NoopProgress,
    PolicyAssistant, RetrievalError, Retriever, Role, Splitter, TextGenerator,
};
use rag_store::{
    EmbeddingsProvider, IndexPoint, MetadataFilter, RagError, ScoredPoint, VectorRepository,
    merge_ranked,
};

const DIM: usize = 4;

/* ---------------- fakes ---------------- */

#[derive(Clone, Copy, PartialEq)]
enum EmbedMode {
    Normal,
    Empty,
    WrongDim,
    DropOne,
    Fail,
}

/// Topic-keyed embeddings: pets, baggage, refunds, everything else.
struct FakeEmbedder {
    mode: Mutex<EmbedMode>,
}

impl FakeEmbedder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            mode: Mutex::new(EmbedMode::Normal),
        })
    }

    fn set(&self, mode: EmbedMode) {
        *self.mode.lock().unwrap() = mode;
    }

    fn vector(text: &str) -> Vec<f32> {
        let t = text.to_lowercase();
        let mut v = vec![0.05; DIM];
        if t.contains("pet") {
            v[0] = 1.0;
        }
        if t.contains("bag") {
            v[1] = 1.0;
        }
        if t.contains("refund") {
            v[2] = 1.0;
        }
        v[3] = 0.1;
        v
    }
}

impl EmbeddingsProvider for FakeEmbedder {
    fn embed_texts<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, RagError>> {
        let mode = *self.mode.lock().unwrap();
        Box::pin(async move {
            match mode {
                EmbedMode::Normal => Ok(texts.iter().map(|t| Self::vector(t)).collect()),
                EmbedMode::Empty => Ok(Vec::new()),
                EmbedMode::WrongDim => Ok(texts.iter().map(|_| vec![0.0; DIM + 1]).collect()),
                EmbedMode::DropOne => {
                    Ok(texts.iter().skip(1).map(|t| Self::vector(t)).collect())
                }
                EmbedMode::Fail => Err(RagError::Qdrant("embedding backend down".into())),
            }
        })
    }

    fn embed_query<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
        let mode = *self.mode.lock().unwrap();
        Box::pin(async move {
            if mode == EmbedMode::Fail {
                return Err(RagError::Qdrant("embedding backend down".into()));
            }
            Ok(Self::vector(text))
        })
    }
}

/// HashMap keyed by point id, so upserts overwrite.
#[derive(Default)]
struct MemoryStore {
    points: Mutex<HashMap<String, IndexPoint>>,
    ensured: Mutex<usize>,
}

impl MemoryStore {
    fn len(&self) -> usize {
        self.points.lock().unwrap().len()
    }

    fn payload_hashes(&self) -> Vec<String> {
        self.points
            .lock()
            .unwrap()
            .values()
            .map(|p| p.payload.sha256.clone())
            .collect()
    }

    fn ranked(&self, vector: &[f32], keep: impl Fn(&serde_json::Value) -> bool) -> Vec<ScoredPoint> {
        let points = self.points.lock().unwrap();
        let mut hits: Vec<ScoredPoint> = points
            .values()
            .filter_map(|p| {
                let payload = serde_json::to_value(&p.payload).ok()?;
                keep(&payload).then(|| ScoredPoint {
                    id: p.id.clone(),
                    score: cosine(vector, &p.vector),
                    payload,
                })
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 { 0.0 } else { dot / (na * nb) }
}

impl VectorRepository for MemoryStore {
    fn ensure_collection(&self) -> BoxFuture<'_, Result<(), RagError>> {
        *self.ensured.lock().unwrap() += 1;
        Box::pin(async { Ok(()) })
    }

    fn upsert_points(&self, points: Vec<IndexPoint>) -> BoxFuture<'_, Result<usize, RagError>> {
        let n = points.len();
        let mut map = self.points.lock().unwrap();
        for p in points {
            map.insert(p.id.clone(), p);
        }
        Box::pin(async move { Ok(n) })
    }

    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&'a MetadataFilter>,
    ) -> BoxFuture<'a, Result<Vec<ScoredPoint>, RagError>> {
        let out = match filter {
            None => {
                let mut all = self.ranked(&vector, |_| true);
                all.truncate(top_k as usize);
                all
            }
            Some(f) => {
                let preferred = if f.should.is_empty() {
                    Vec::new()
                } else {
                    self.ranked(&vector, |p| f.matches_required(p) && f.matches_preferred(p))
                };
                let fallback = self.ranked(&vector, |p| f.matches_required(p));
                merge_ranked(preferred, fallback, top_k as usize)
            }
        };
        Box::pin(async move { Ok(out) })
    }
}

struct ScriptedLlm {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl ScriptedLlm {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            fail,
        })
    }
}

impl TextGenerator for ScriptedLlm {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err(GenerationError("provider timeout".into()))
            } else {
                Ok("Small pets may travel in the cabin.".to_string())
            }
        })
    }
}

/* ---------------- helpers ---------------- */

fn meta(airline: &str, version: &str, doc_id: &str) -> DocumentMeta {
    DocumentMeta {
        airline: airline.into(),
        locale: "en-US".into(),
        policy_version: version.into(),
        doc_id: doc_id.into(),
        source: format!("policies/{airline}/{doc_id}.md"),
    }
}

fn wiring() -> (Arc<MemoryStore>, Arc<FakeEmbedder>, Indexer) {
    let store = Arc::new(MemoryStore::default());
    let embedder = FakeEmbedder::new();
    let indexer = Indexer::new(store.clone(), embedder.clone(), DIM);
    (store, embedder, indexer)
}

fn assistant(
    store: Arc<MemoryStore>,
    embedder: Arc<FakeEmbedder>,
    llm: Arc<ScriptedLlm>,
) -> PolicyAssistant {
    PolicyAssistant::new(
        Arc::new(Retriever::new(store, embedder, 5)),
        ContextBuilder::new(3000),
        Arc::new(AnswerGenerator::new(llm)),
        Arc::new(ConversationMemory::new(5)),
    )
}

fn ask(question: &str, airline: &str, session: Option<&str>) -> AskInput {
    AskInput {
        question: question.into(),
        airline: airline.into(),
        locale: "en-US".into(),
        policy_version: Some("2025-10-01".into()),
        session_id: session.map(str::to_string),
    }
}

/* ---------------- indexing ---------------- */

#[tokio::test]
async fn reindexing_same_chunks_overwrites_in_place() {
    let (store, _, indexer) = wiring();
    let splitter = Splitter::new(40, 5).unwrap();
    let text = "Pets under 20 lbs travel in cabin. Checked bags cost $35 each on domestic routes.";
    let chunks = splitter.split(text, &meta("Delta", "2025-10-01", "pets"));
    assert!(chunks.len() >= 2);

    assert_eq!(indexer.index(&chunks).await.unwrap(), chunks.len());
    assert_eq!(indexer.index(&chunks).await.unwrap(), chunks.len());
    assert_eq!(store.len(), chunks.len());
    assert_eq!(*store.ensured.lock().unwrap(), 2);
}

#[tokio::test]
async fn changed_text_keeps_id_but_changes_hash() {
    let (store, _, indexer) = wiring();
    let splitter = Splitter::new(1000, 120).unwrap();
    let m = meta("United", "2025-10-01", "refunds");

    indexer
        .index(&splitter.split("Refunds within 24 hours.", &m))
        .await
        .unwrap();
    let before = store.payload_hashes();

    indexer
        .index(&splitter.split("Refunds within 48 hours.", &m))
        .await
        .unwrap();
    let after = store.payload_hashes();

    assert_eq!(store.len(), 1);
    assert_ne!(before, after);
}

#[tokio::test]
async fn empty_embedding_batch_fails_without_upsert() {
    let (store, embedder, indexer) = wiring();
    embedder.set(EmbedMode::Empty);
    let chunks = Splitter::new(100, 10)
        .unwrap()
        .split("Bag rules.", &meta("Delta", "v1", "bags"));

    let err = indexer.index(&chunks).await.unwrap_err();
    assert!(matches!(err, IndexingError::EmptyEmbeddings));
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn empty_chunk_list_is_an_empty_batch() {
    let (store, _, indexer) = wiring();
    let err = indexer.index(&[]).await.unwrap_err();
    assert!(matches!(err, IndexingError::EmptyEmbeddings));
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn wrong_dimension_fails_without_upsert() {
    let (store, embedder, indexer) = wiring();
    embedder.set(EmbedMode::WrongDim);
    let chunks = Splitter::new(100, 10)
        .unwrap()
        .split("Bag rules.", &meta("Delta", "v1", "bags"));

    let err = indexer.index(&chunks).await.unwrap_err();
    assert!(matches!(
        err,
        IndexingError::DimensionMismatch { got: 5, want: 4 }
    ));
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn vector_count_mismatch_fails_whole_call() {
    let (store, embedder, indexer) = wiring();
    embedder.set(EmbedMode::DropOne);
    let chunks = Splitter::new(10, 2)
        .unwrap()
        .split("Baggage allowance: two pieces.", &meta("Delta", "v1", "bags"));
    assert!(chunks.len() > 1);

    let err = indexer.index(&chunks).await.unwrap_err();
    assert!(matches!(err, IndexingError::CountMismatch { .. }));
    assert_eq!(store.len(), 0);
}

/* ---------------- retrieval ---------------- */

#[tokio::test]
async fn unknown_airline_yields_empty_context() {
    let (store, embedder, indexer) = wiring();
    let chunks = Splitter::new(200, 20)
        .unwrap()
        .split("Pets travel in cabin.", &meta("Delta", "2025-10-01", "pets"));
    indexer.index(&chunks).await.unwrap();

    let retriever = Retriever::new(store, embedder, 5);
    let q = MetadataQuery::new("NoSuchAir", "en-US", None);
    let fragments = retriever.retrieve("pets?", &q).await.unwrap();
    assert!(fragments.is_empty());
    assert_eq!(ContextBuilder::new(3000).build(&fragments), "");
}

#[tokio::test]
async fn retrieval_ranks_by_similarity_within_airline() {
    let (store, embedder, indexer) = wiring();
    let s = Splitter::new(500, 50).unwrap();
    for (doc, text) in [
        ("bags", "Checked bag fees are $35."),
        ("pets", "Pets must stay in a carrier."),
        ("refunds", "Refund requests take 7 days."),
    ] {
        indexer
            .index(&s.split(text, &meta("Delta", "2025-10-01", doc)))
            .await
            .unwrap();
    }
    indexer
        .index(&s.split("United pets policy.", &meta("United", "2025-10-01", "pets")))
        .await
        .unwrap();

    let retriever = Retriever::new(store, embedder, 2);
    let q = MetadataQuery::new("Delta", "en-US", None);
    let fragments = retriever.retrieve("Can my pet fly?", &q).await.unwrap();
    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0], "Pets must stay in a carrier.");
    assert!(fragments.iter().all(|f| !f.contains("United")));
}

#[tokio::test]
async fn preferred_version_ranks_first_but_others_still_match() {
    let (store, embedder, indexer) = wiring();
    let s = Splitter::new(500, 50).unwrap();
    indexer
        .index(&s.split("Pets: old rule.", &meta("Delta", "2024-01-01", "pets")))
        .await
        .unwrap();
    indexer
        .index(&s.split("Bags: new rule.", &meta("Delta", "2025-10-01", "bags")))
        .await
        .unwrap();

    let retriever = Retriever::new(store.clone(), embedder.clone(), 5);
    let q = MetadataQuery::new("Delta", "en-US", Some("2025-10-01".into()));
    let fragments = retriever.retrieve("pets", &q).await.unwrap();
    assert_eq!(fragments, vec!["Bags: new rule.", "Pets: old rule."]);

    let missing = MetadataQuery::new("Delta", "en-US", Some("1999-01-01".into()));
    let fragments = retriever.retrieve("pets", &missing).await.unwrap();
    assert_eq!(fragments.len(), 2);
}

#[tokio::test]
async fn embedding_failure_is_a_retrieval_error() {
    let (store, embedder, _) = wiring();
    embedder.set(EmbedMode::Fail);
    let retriever = Retriever::new(store, embedder, 5);
    let err = retriever
        .retrieve("bags", &MetadataQuery::new("Delta", "en-US", None))
        .await
        .unwrap_err();
    assert!(matches!(err, RetrievalError::Embedding(_)));
}

/* ---------------- assistant ---------------- */

#[tokio::test]
async fn ask_answers_and_records_session_turns() {
    let (store, embedder, indexer) = wiring();
    indexer
        .index(
            &Splitter::new(500, 50)
                .unwrap()
                .split("Small pets may travel in the cabin.", &meta("Delta", "2025-10-01", "pets")),
        )
        .await
        .unwrap();

    let llm = ScriptedLlm::new(false);
    let bot = assistant(store, embedder, llm.clone());

    let first = bot
        .ask(ask("Can I bring my cat?", "Delta", Some("s-1")))
        .await
        .unwrap();
    assert_eq!(first.question, "Can I bring my cat?");
    assert_eq!(first.context, "Context:\nSmall pets may travel in the cabin.");
    assert_eq!(first.answer, "Small pets may travel in the cabin.");

    bot.ask(ask("And a dog?", "Delta", Some("s-1"))).await.unwrap();

    {
        let prompts = llm.prompts.lock().unwrap();
        assert!(!prompts[0].contains("Previous conversation"));
        assert!(prompts[1].contains(
            "Previous conversation:\nUser: Can I bring my cat?\nAssistant: Small pets"
        ));
    }

    let turns = bot.memory().get("s-1", None).await;
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[3].role, Role::Assistant);
}

#[tokio::test]
async fn generation_outage_still_answers_with_fallback() {
    let (store, embedder, _) = wiring();
    let bot = assistant(store, embedder, ScriptedLlm::new(true));

    let out = bot.ask(ask("Baggage?", "Delta", Some("s-2"))).await.unwrap();
    assert_eq!(out.answer, FALLBACK_ANSWER);
    assert_eq!(out.context, "");
    assert_eq!(bot.memory().get("s-2", None).await.len(), 2);
}

#[tokio::test]
async fn retrieval_failure_leaves_memory_untouched() {
    let (store, embedder, _) = wiring();
    embedder.set(EmbedMode::Fail);
    let bot = assistant(store, embedder, ScriptedLlm::new(false));

    assert!(bot.ask(ask("Baggage?", "Delta", Some("s-3"))).await.is_err());
    assert!(bot.memory().get("s-3", None).await.is_empty());
}

#[tokio::test]
async fn anonymous_requests_do_not_touch_memory() {
    let (store, embedder, _) = wiring();
    let bot = assistant(store, embedder, ScriptedLlm::new(false));
    bot.ask(ask("Baggage?", "Delta", None)).await.unwrap();
    assert!(bot.memory().get("", None).await.is_empty());
}

/* ---------------- ingestion ---------------- */

fn write(dir: &Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).unwrap();
}

#[tokio::test]
async fn ingest_airline_isolates_documents() {
    let root = tempfile::tempdir().unwrap();
    let delta = root.path().join("Delta");
    std::fs::create_dir(&delta).unwrap();
    write(&delta, "baggage.md", "# Baggage\nTwo checked bags on international routes.");
    write(&delta, "pets.txt", "Pets in cabin must fit under the seat.");
    write(&delta, "scan.pdf", "%PDF-1.7");
    write(&delta, "empty.md", "   ");

    let (store, _, indexer) = wiring();
    let ingestor = Ingestor::new(
        Splitter::new(1000, 120).unwrap(),
        Arc::new(indexer),
        Arc::new(NoopProgress),
    );

    let report = ingestor
        .ingest_airline(root.path(), "Delta", "en-US", "2025-10-01")
        .await;
    assert_eq!(report.airline, "Delta");
    assert_eq!(report.documents_indexed, 2);
    assert_eq!(report.chunks_indexed, 2);
    assert_eq!(report.skipped, 2);
    assert!(report.failures.is_empty());
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn ingest_all_survives_missing_folders_and_failures() {
    let root = tempfile::tempdir().unwrap();
    let united = root.path().join("United");
    std::fs::create_dir(&united).unwrap();
    write(&united, "refunds.md", "Refunds are issued to the original form of payment.");

    let (store, embedder, indexer) = wiring();
    let ingestor = Ingestor::new(
        Splitter::new(1000, 120).unwrap(),
        Arc::new(indexer),
        Arc::new(NoopProgress),
    );

    let airlines = vec!["Delta".to_string(), "United".to_string()];
    let reports = ingestor
        .ingest_all(root.path(), &airlines, "en-US", "2025-10-01")
        .await;
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].documents_indexed, 0);
    assert_eq!(reports[1].documents_indexed, 1);

    embedder.set(EmbedMode::WrongDim);
    let reports = ingestor
        .ingest_all(root.path(), &airlines[1..], "en-US", "2025-10-01")
        .await;
    assert_eq!(reports[0].failures.len(), 1);
    assert_eq!(reports[0].failures[0].doc_id, "United/refunds");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn same_file_name_under_two_airlines_keeps_both() {
    let root = tempfile::tempdir().unwrap();
    for (airline, body) in [
        ("Delta", "Delta bags: two checked bags free."),
        ("United", "United bags: first checked bag costs $40."),
    ] {
        let dir = root.path().join(airline);
        std::fs::create_dir(&dir).unwrap();
        write(&dir, "baggage.md", body);
    }

    let (store, embedder, indexer) = wiring();
    let ingestor = Ingestor::new(
        Splitter::new(1000, 120).unwrap(),
        Arc::new(indexer),
        Arc::new(NoopProgress),
    );
    let airlines = vec!["Delta".to_string(), "United".to_string()];
    let reports = ingestor
        .ingest_all(root.path(), &airlines, "en-US", "2025-10-01")
        .await;
    assert_eq!(reports[0].chunks_indexed + reports[1].chunks_indexed, 2);
    assert_eq!(store.len(), 2);

    let retriever = Retriever::new(store, embedder, 5);
    for (airline, expected) in [
        ("Delta", "Delta bags: two checked bags free."),
        ("United", "United bags: first checked bag costs $40."),
    ] {
        let q = MetadataQuery::new(airline, "en-US", None);
        let fragments = retriever.retrieve("bags?", &q).await.unwrap();
        assert_eq!(fragments, vec![expected.to_string()], "{airline}");
    }
}

#[tokio::test]
async fn airline_names_cannot_leave_the_policies_dir() {
    let root = tempfile::tempdir().unwrap();
    let policies = root.path().join("policies");
    std::fs::create_dir(&policies).unwrap();
    let secret = root.path().join("secret");
    std::fs::create_dir(&secret).unwrap();
    write(&secret, "keys.md", "top secret");

    let (store, _, indexer) = wiring();
    let ingestor = Ingestor::new(
        Splitter::new(1000, 120).unwrap(),
        Arc::new(indexer),
        Arc::new(NoopProgress),
    );

    let absolute = secret.display().to_string();
    for airline in ["../secret", absolute.as_str()] {
        let report = ingestor
            .ingest_airline(&policies, airline, "en-US", "2025-10-01")
            .await;
        assert_eq!(report.documents_indexed, 0, "{airline}");
        assert_eq!(report.failures.len(), 1, "{airline}");
    }
    assert_eq!(store.len(), 0);
}
