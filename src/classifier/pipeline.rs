use std::{sync::Arc, time::Duration};

use tokio::time::timeout;

use crate::{
    ai::{InferenceError, ZeroShotClassifier, ZeroShotPrediction},
    config::ClassifierConfig,
    domain::{Category, ClassificationResult, ClassificationSource},
};

use super::{
    fallback::fallback,
    gate::{ConfidenceGate, GateDecision},
    keywords::KeywordSet,
    labels::LabelMap,
    normalize::{collapse_whitespace, normalize, token_count},
};

pub const MIN_TOKENS: usize = 3;

pub struct EmailClassifier {
    remote: Arc<dyn ZeroShotClassifier>,
    keywords: KeywordSet,
    labels: LabelMap,
    gate: ConfidenceGate,
    deadline: Duration,
}

impl EmailClassifier {
    pub fn new(remote: Arc<dyn ZeroShotClassifier>, config: &ClassifierConfig) -> Self {
        Self {
            remote,
            keywords: KeywordSet::default(),
            labels: LabelMap::default(),
            gate: ConfidenceGate::new(config.confidence_threshold, config.confidence_margin),
            deadline: config.deadline,
        }
    }

    /// Keyword checks see the whole message, subject and signature included.
    /// Only the stripped body is counted and sent to the model.
    pub async fn classify(&self, raw: &str) -> ClassificationResult {
        let body = normalize(raw);
        let tokens = token_count(&body);
        if tokens < MIN_TOKENS {
            tracing::info!(target: "classifier", tokens, "email too short; Improdutivo");
            return ClassificationResult::heuristic(Category::Improdutivo, None);
        }

        let full_text = collapse_whitespace(raw);
        if let Some(hit) = self.keywords.blocking_match(&full_text) {
            tracing::info!(
                target: "classifier",
                kind = ?hit.kind,
                keyword = hit.keyword,
                "blocking keyword detected; Improdutivo"
            );
            return ClassificationResult::heuristic(Category::Improdutivo, Some(hit));
        }

        self.classify_remote(&body, &full_text).await
    }

    async fn classify_remote(&self, body: &str, full_text: &str) -> ClassificationResult {
        let candidates = self.labels.candidates();
        let remote = match timeout(self.deadline, self.remote.classify(body, &candidates)).await {
            Ok(result) => result,
            Err(_) => Err(InferenceError::DeadlineExceeded(self.deadline)),
        };

        match remote {
            Ok(prediction) => self.decide(full_text, &prediction),
            Err(err) => {
                tracing::warn!(
                    target: "classifier",
                    error = %err,
                    "zero-shot classifier unavailable; using keyword fallback"
                );
                self.fallback_result(full_text, 0.0)
            }
        }
    }

    fn decide(&self, text: &str, prediction: &ZeroShotPrediction) -> ClassificationResult {
        let ranked = prediction.ranked();
        let Some(top) = ranked.first() else {
            return self.fallback_result(text, 0.0);
        };
        let second_score = ranked.get(1).map(|pair| pair.score).unwrap_or(0.0);

        match self.gate.evaluate(top.score, second_score) {
            GateDecision::Accept => {
                let label = self.labels.resolve(&top.label);
                tracing::info!(
                    target: "classifier",
                    %label,
                    top_label = %top.label,
                    score = top.score,
                    "zero-shot label accepted"
                );
                ClassificationResult {
                    label,
                    score: top.score,
                    source: ClassificationSource::RemoteModel,
                    matched_keyword: None,
                }
            }
            GateDecision::Reject => {
                tracing::info!(
                    target: "classifier",
                    top_label = %top.label,
                    score = top.score,
                    second_score,
                    "low confidence; using keyword fallback"
                );
                self.fallback_result(text, top.score)
            }
        }
    }

    fn fallback_result(&self, text: &str, score: f64) -> ClassificationResult {
        let (label, matched_keyword) = fallback(text, &self.keywords);
        tracing::info!(
            target: "classifier",
            %label,
            keyword = matched_keyword.map(|hit| hit.keyword),
            "fallback decision"
        );
        ClassificationResult {
            label,
            score,
            source: ClassificationSource::Fallback,
            matched_keyword,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::KeywordKind;

    enum Script {
        Answer(Vec<(&'static str, f64)>),
        Fail,
        Hang,
    }

    struct FakeRemote {
        script: Script,
        calls: AtomicU32,
        inputs: parking_lot::Mutex<Vec<String>>,
    }

    impl FakeRemote {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                script,
                calls: AtomicU32::new(0),
                inputs: parking_lot::Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ZeroShotClassifier for FakeRemote {
        async fn classify(
            &self,
            text: &str,
            candidate_labels: &[&str],
        ) -> Result<ZeroShotPrediction, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inputs.lock().push(text.to_string());
            assert!((5..=7).contains(&candidate_labels.len()));
            match &self.script {
                Script::Answer(pairs) => Ok(ZeroShotPrediction {
                    labels: pairs.iter().map(|(l, _)| l.to_string()).collect(),
                    scores: pairs.iter().map(|(_, s)| *s).collect(),
                }),
                Script::Fail => Err(InferenceError::Exhausted {
                    attempts: 3,
                    last: Box::new(InferenceError::Timeout(Duration::from_secs(60))),
                }),
                Script::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Err(InferenceError::Timeout(Duration::from_secs(30)))
                }
            }
        }
    }

    const WORK: &str = "email sobre trabalho, projetos, tarefas, reuniões ou negócios (produtivo)";
    const GREETINGS: &str =
        "email de saudações, datas comemorativas ou felicitações (improdutivo)";
    const SUPPORT: &str = "email solicitando suporte técnico ou resolução de problemas (produtivo)";

    fn classifier(remote: Arc<FakeRemote>) -> EmailClassifier {
        EmailClassifier::new(remote, &ClassifierConfig::default())
    }

    #[tokio::test]
    async fn short_text_never_calls_remote() {
        let remote = FakeRemote::new(Script::Answer(vec![(WORK, 0.99)]));
        let classifier = classifier(remote.clone());
        for text in ["", "   ", "oi", "bom dia"] {
            let result = classifier.classify(text).await;
            assert_eq!(result.label, Category::Improdutivo);
            assert_eq!(result.source, ClassificationSource::Heuristic);
        }
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn scam_keyword_short_circuits_confident_remote() {
        let remote = FakeRemote::new(Script::Answer(vec![(WORK, 0.99), (SUPPORT, 0.01)]));
        let classifier = classifier(remote.clone());
        let result = classifier
            .classify("Reunião do projeto: você foi CONTEMPLADO com um carro zero")
            .await;
        assert_eq!(result.label, Category::Improdutivo);
        assert_eq!(result.source, ClassificationSource::Heuristic);
        assert_eq!(result.matched_keyword.map(|hit| hit.kind), Some(KeywordKind::Scam));
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn scam_keyword_in_subject_line_short_circuits() {
        let remote = FakeRemote::new(Script::Answer(vec![(WORK, 0.95), (SUPPORT, 0.02)]));
        let result = classifier(remote.clone())
            .classify("Subject: Você foi contemplado com um prêmio\n\nOlá, confirme seus dados para o projeto hoje")
            .await;
        assert_eq!(result.label, Category::Improdutivo);
        assert_eq!(result.source, ClassificationSource::Heuristic);
        assert_eq!(result.matched_keyword.map(|hit| hit.keyword), Some("contemplado"));
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn scam_keyword_below_signature_short_circuits() {
        let remote = FakeRemote::new(Script::Answer(vec![(WORK, 0.95), (SUPPORT, 0.02)]));
        let result = classifier(remote.clone())
            .classify("Segue o relatório do projeto para análise.\r\n\r\nAtenciosamente,\r\nJoão\r\nPS: clique no link e resgate seu prêmio")
            .await;
        assert_eq!(result.label, Category::Improdutivo);
        assert_eq!(result.matched_keyword.map(|hit| hit.kind), Some(KeywordKind::Scam));
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn remote_receives_stripped_body() {
        let remote = FakeRemote::new(Script::Answer(vec![(WORK, 0.95), (SUPPORT, 0.02)]));
        let result = classifier(remote.clone())
            .classify("From: ana@empresa.com\nSubject: Cronograma\n\nPodemos alinhar a entrega na quinta?\n\nAtenciosamente,\nAna")
            .await;
        assert_eq!(result.source, ClassificationSource::RemoteModel);
        assert_eq!(
            remote.inputs.lock().as_slice(),
            ["Podemos alinhar a entrega na quinta?".to_string()]
        );
    }

    #[tokio::test]
    async fn fallback_scans_subject_line() {
        let remote = FakeRemote::new(Script::Fail);
        let result = classifier(remote)
            .classify("Assunto: Contrato anual\n\nOlá, tudo certo por aí? Aguardo retorno.")
            .await;
        assert_eq!(result.source, ClassificationSource::Fallback);
        assert_eq!(result.label, Category::Produtivo);
        assert_eq!(result.matched_keyword.map(|hit| hit.keyword), Some("contrato"));
    }

    #[tokio::test]
    async fn marketing_keyword_short_circuits() {
        let remote = FakeRemote::new(Script::Answer(vec![(WORK, 0.99)]));
        let classifier = classifier(remote.clone());
        let result = classifier
            .classify("Aproveite o cupom exclusivo para o seu próximo pedido")
            .await;
        assert_eq!(result.label, Category::Improdutivo);
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn confident_remote_label_is_accepted() {
        let remote = FakeRemote::new(Script::Answer(vec![(SUPPORT, 0.91), (WORK, 0.05)]));
        let result = classifier(remote.clone())
            .classify("Bom dia, o sistema não abre desde ontem à noite")
            .await;
        assert_eq!(result.label, Category::Produtivo);
        assert_eq!(result.source, ClassificationSource::RemoteModel);
        assert_eq!(result.score, 0.91);
        assert_eq!(remote.calls(), 1);
    }

    #[tokio::test]
    async fn productive_keyword_does_not_override_confident_remote() {
        let remote = FakeRemote::new(Script::Answer(vec![(GREETINGS, 0.88), (WORK, 0.07)]));
        let result = classifier(remote)
            .classify("Obrigado pela reunião de ontem, feliz aniversário ao time")
            .await;
        assert_eq!(result.label, Category::Improdutivo);
        assert_eq!(result.source, ClassificationSource::RemoteModel);
    }

    #[tokio::test]
    async fn unsorted_remote_scores_are_ranked() {
        let remote = FakeRemote::new(Script::Answer(vec![(GREETINGS, 0.04), (SUPPORT, 0.93)]));
        let result = classifier(remote)
            .classify("Preciso de ajuda para acessar o portal hoje")
            .await;
        assert_eq!(result.label, Category::Produtivo);
        assert_eq!(result.score, 0.93);
    }

    #[tokio::test]
    async fn unknown_remote_label_maps_to_improdutivo() {
        let remote = FakeRemote::new(Script::Answer(vec![("Produtivo", 0.97), (WORK, 0.01)]));
        let result = classifier(remote)
            .classify("Preciso de ajuda para acessar o portal hoje")
            .await;
        assert_eq!(result.label, Category::Improdutivo);
        assert_eq!(result.source, ClassificationSource::RemoteModel);
    }

    #[tokio::test]
    async fn gate_boundary_is_inclusive() {
        let remote = FakeRemote::new(Script::Answer(vec![(WORK, 0.75), (GREETINGS, 0.60)]));
        let result = classifier(remote)
            .classify("Olá equipe, feliz natal e um ótimo ano novo para todos!")
            .await;
        assert_eq!(result.source, ClassificationSource::RemoteModel);
        assert_eq!(result.label, Category::Produtivo);
    }

    #[tokio::test]
    async fn just_below_threshold_goes_to_fallback() {
        let remote =
            FakeRemote::new(Script::Answer(vec![(WORK, 0.75 - 1e-6), (GREETINGS, 0.0)]));
        let result = classifier(remote)
            .classify("Olá equipe, feliz natal e um ótimo ano novo para todos!")
            .await;
        assert_eq!(result.source, ClassificationSource::Fallback);
        assert_eq!(result.label, Category::Improdutivo);
        assert!((result.score - (0.75 - 1e-6)).abs() < 1e-12);
    }

    #[tokio::test]
    async fn ambiguous_remote_uses_productive_bias() {
        let remote = FakeRemote::new(Script::Answer(vec![(GREETINGS, 0.52), (WORK, 0.48)]));
        let result = classifier(remote)
            .classify("Prezados, estou com um problema no sistema e não consigo acessar minha conta.")
            .await;
        assert_eq!(result.label, Category::Produtivo);
        assert_eq!(result.source, ClassificationSource::Fallback);
        assert_eq!(result.matched_keyword.map(|hit| hit.keyword), Some("problema"));
    }

    #[tokio::test]
    async fn remote_failure_routes_to_fallback() {
        let remote = FakeRemote::new(Script::Fail);
        let classifier = classifier(remote.clone());

        let productive = classifier
            .classify("Prezados, estou com um problema no sistema e não consigo acessar minha conta.")
            .await;
        assert_eq!(productive.label, Category::Produtivo);
        assert_eq!(productive.source, ClassificationSource::Fallback);
        assert_eq!(productive.score, 0.0);

        let greeting = classifier
            .classify("Olá equipe, feliz natal e um ótimo ano novo para todos!")
            .await;
        assert_eq!(greeting.label, Category::Improdutivo);
        assert_eq!(greeting.source, ClassificationSource::Fallback);
        assert_eq!(remote.calls(), 2);
    }

    #[tokio::test]
    async fn deadline_cancels_a_hanging_remote() {
        let remote = FakeRemote::new(Script::Hang);
        let config = ClassifierConfig {
            deadline: Duration::from_millis(20),
            ..ClassifierConfig::default()
        };
        let result = EmailClassifier::new(remote, &config)
            .classify("Segue o contrato assinado para conferência")
            .await;
        assert_eq!(result.source, ClassificationSource::Fallback);
        assert_eq!(result.label, Category::Produtivo);
    }

    #[tokio::test]
    async fn same_input_and_remote_give_same_result() {
        let remote = FakeRemote::new(Script::Answer(vec![(WORK, 0.81), (SUPPORT, 0.12)]));
        let classifier = classifier(remote);
        let text = "Podemos alinhar o cronograma da entrega na quinta?";
        let first = classifier.classify(text).await;
        let second = classifier.classify(text).await;
        assert_eq!(first, second);
    }
}
