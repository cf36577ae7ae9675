use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use rand::{rngs::StdRng, SeedableRng};
use tokio::time::timeout;

use crate::{
    ai::{InferenceError, TextGenerator},
    classifier::{normalize, token_count, MIN_TOKENS},
    config::ReplyFallback,
    domain::Category,
};

use super::{
    extract::extract_final_reply,
    templates::{static_reply, ReplyTemplateSet},
};

const PRODUCTIVE_INSTRUCTION: &str = "Você é um assistente profissional. \
IMPORTANTE: A sua tarefa é gerar APENAS a mensagem final pronta para ser enviada. \
NUNCA explique o seu raciocínio, NUNCA descreva seus pensamentos internos, \
NÃO diga o que vai fazer, NÃO mostre anotações, NEM comentários internos. \
Responda diretamente como se estivesse enviando o email ao usuário.";
const PRODUCTIVE_CLOSING: &str = "Responda com uma mensagem educada, clara e profissional.";

const UNPRODUCTIVE_INSTRUCTION: &str = "Você é um assistente cordial. \
IMPORTANTE: A sua tarefa é gerar APENAS a mensagem final pronta para ser enviada. \
NUNCA explique o seu raciocínio, NUNCA descreva seus pensamentos internos, \
NÃO diga o que vai fazer, NEM mostre comentários internos. \
Responda diretamente como se estivesse enviando o email ao usuário.";
const UNPRODUCTIVE_CLOSING: &str = "Responda com uma mensagem curta, amigável e educada.";

pub fn build_prompt(category: Category, email: &str) -> String {
    let (instruction, closing) = match category {
        Category::Produtivo => (PRODUCTIVE_INSTRUCTION, PRODUCTIVE_CLOSING),
        Category::Improdutivo => (UNPRODUCTIVE_INSTRUCTION, UNPRODUCTIVE_CLOSING),
    };
    format!("{instruction}\n\nEmail recebido:\n{email}\n\n{closing}")
}

pub struct ResponseSelector {
    generator: Arc<dyn TextGenerator>,
    fallback: ReplyFallback,
    templates: ReplyTemplateSet,
    rng: Mutex<StdRng>,
    deadline: Duration,
}

impl ResponseSelector {
    pub fn new(generator: Arc<dyn TextGenerator>, fallback: ReplyFallback, deadline: Duration) -> Self {
        Self::with_rng(generator, fallback, deadline, StdRng::from_entropy())
    }

    pub fn with_rng(
        generator: Arc<dyn TextGenerator>,
        fallback: ReplyFallback,
        deadline: Duration,
        rng: StdRng,
    ) -> Self {
        Self {
            generator,
            fallback,
            templates: ReplyTemplateSet::default(),
            rng: Mutex::new(rng),
            deadline,
        }
    }

    pub async fn select_reply(&self, category: Category, original_text: &str) -> String {
        if token_count(&normalize(original_text)) < MIN_TOKENS {
            tracing::info!(target: "reply", %category, "content too short; skipping generation");
            return self.fallback_reply(category, original_text);
        }

        let prompt = build_prompt(category, original_text);
        let generated = match timeout(self.deadline, self.generator.generate(&prompt)).await {
            Ok(result) => result,
            Err(_) => Err(InferenceError::DeadlineExceeded(self.deadline)),
        };

        match generated {
            Ok(raw) => {
                let reply = extract_final_reply(&raw);
                if reply.is_empty() {
                    tracing::warn!(
                        target: "reply",
                        %category,
                        raw_chars = raw.len(),
                        "generated text had no usable message; using fallback"
                    );
                    return self.fallback_reply(category, original_text);
                }
                tracing::info!(target: "reply", %category, chars = reply.len(), "generated reply");
                reply
            }
            Err(err) => {
                tracing::warn!(target: "reply", %category, error = %err, "reply generation failed; using fallback");
                self.fallback_reply(category, original_text)
            }
        }
    }

    fn fallback_reply(&self, category: Category, original_text: &str) -> String {
        match self.fallback {
            ReplyFallback::Static => static_reply(category).to_string(),
            ReplyFallback::Templates => {
                let mut rng = self.rng.lock();
                self.templates
                    .choose(category, original_text, &mut *rng)
                    .to_string()
            }
        }
    }
}
