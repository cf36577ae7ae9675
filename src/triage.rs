use crate::{
    classifier::EmailClassifier,
    domain::EmailOutcome,
    reply::ResponseSelector,
};

pub struct EmailTriage {
    classifier: EmailClassifier,
    selector: ResponseSelector,
}

impl EmailTriage {
    pub fn new(classifier: EmailClassifier, selector: ResponseSelector) -> Self {
        Self {
            classifier,
            selector,
        }
    }

    pub async fn process(&self, content: &str) -> EmailOutcome {
        let classification = self.classifier.classify(content).await;
        let resposta = self
            .selector
            .select_reply(classification.label, content)
            .await;

        tracing::info!(
            target: "classifier",
            categoria = %classification.label,
            source = classification.source.label(),
            score = classification.score,
            "email classified"
        );

        EmailOutcome {
            categoria: classification.label,
            resposta,
            classification,
        }
    }
}
