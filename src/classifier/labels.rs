use crate::domain::Category;

pub const CANDIDATE_LABELS: &[(&str, Category)] = &[
    (
        "email sobre trabalho, projetos, tarefas, reuniões ou negócios (produtivo)",
        Category::Produtivo,
    ),
    (
        "email solicitando informações, orçamento ou documentos profissionais (produtivo)",
        Category::Produtivo,
    ),
    (
        "email solicitando suporte técnico ou resolução de problemas (produtivo)",
        Category::Produtivo,
    ),
    (
        "email de propaganda ou marketing legítimo (improdutivo)",
        Category::Improdutivo,
    ),
    (
        "email de golpe, phishing, fraude ou scam (improdutivo)",
        Category::Improdutivo,
    ),
    (
        "email pessoal, cumprimentos, conversa informal, correntes ou brincadeiras (improdutivo)",
        Category::Improdutivo,
    ),
    (
        "email de saudações, datas comemorativas ou felicitações (improdutivo)",
        Category::Improdutivo,
    ),
];

#[derive(Debug, Clone, Copy)]
pub struct LabelMap {
    entries: &'static [(&'static str, Category)],
}

impl Default for LabelMap {
    fn default() -> Self {
        Self {
            entries: CANDIDATE_LABELS,
        }
    }
}

impl LabelMap {
    pub fn candidates(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(label, _)| *label).collect()
    }

    /// Labels the model invents or echoes back altered resolve to Improdutivo.
    pub fn resolve(&self, label: &str) -> Category {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == label)
            .map(|(_, category)| *category)
            .unwrap_or(Category::Improdutivo)
    }
}
