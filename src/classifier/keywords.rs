use crate::domain::{KeywordKind, KeywordMatch};

pub const SCAM_KEYWORDS: &[&str] = &[
    "parabéns",
    "contemplado",
    "benefício exclusivo",
    "últimos dígitos do cpf",
    "clique no link",
    "carro zero",
    "pix imediato",
    "ganhou",
    "prêmio",
    "sorteio",
    "transferência imediata",
    "oferta imperdível",
    "bônus garantido",
    "resgate seu benefício",
];

pub const MARKETING_KEYWORDS: &[&str] = &[
    "desconto",
    "promoção",
    "ganhe",
    "oferta",
    "cupom",
    "publicidade",
    "cashback",
    "black friday",
    "frete grátis",
    "oferta relâmpago",
];

pub const PRODUCTIVE_KEYWORDS: &[&str] = &[
    "proposta",
    "orçamento",
    "reunião",
    "documento",
    "contrato",
    "pedido",
    "suporte",
    "assistência",
    "erro",
    "problema",
    "bloqueio",
    "relatório",
    "projeto",
    "implementação",
    "análise",
    "negócio",
    "parceria",
    "pagamento",
];

#[derive(Debug, Clone, Copy)]
pub struct KeywordSet {
    pub scam: &'static [&'static str],
    pub marketing: &'static [&'static str],
    pub productive: &'static [&'static str],
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self {
            scam: SCAM_KEYWORDS,
            marketing: MARKETING_KEYWORDS,
            productive: PRODUCTIVE_KEYWORDS,
        }
    }
}

impl KeywordSet {
    pub fn first_match(&self, text: &str) -> Option<KeywordMatch> {
        let lower = text.to_lowercase();
        self.tiers()
            .into_iter()
            .find_map(|(kind, keywords)| find_in(&lower, kind, keywords))
    }

    pub fn blocking_match(&self, text: &str) -> Option<KeywordMatch> {
        self.first_match(text)
            .filter(|hit| hit.kind != KeywordKind::ProductiveSignal)
    }

    fn tiers(&self) -> [(KeywordKind, &'static [&'static str]); 3] {
        [
            (KeywordKind::Scam, self.scam),
            (KeywordKind::Marketing, self.marketing),
            (KeywordKind::ProductiveSignal, self.productive),
        ]
    }
}

fn find_in(
    lower: &str,
    kind: KeywordKind,
    keywords: &'static [&'static str],
) -> Option<KeywordMatch> {
    keywords
        .iter()
        .find(|keyword| lower.contains(*keyword))
        .map(|keyword| KeywordMatch {
            kind,
            keyword: *keyword,
        })
}
