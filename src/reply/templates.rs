use rand::{seq::SliceRandom, RngCore};

use crate::domain::Category;

pub const STATIC_PRODUTIVO: &str =
    "Obrigado pelo contato. Nossa equipe analisará sua solicitação em breve.";
pub const STATIC_IMPRODUTIVO: &str = "Obrigado pelo seu email. Desejamos um ótimo dia!";

pub fn static_reply(category: Category) -> &'static str {
    match category {
        Category::Produtivo => STATIC_PRODUTIVO,
        Category::Improdutivo => STATIC_IMPRODUTIVO,
    }
}

const PRODUCTIVE_POOL: &[&str] = &[
    "Olá,\n\nObrigado pelo seu contato. Nossa equipe de suporte já foi notificada sobre sua solicitação e entrará em contato em breve para resolver sua questão.\n\nCaso precise de assistência imediata, consulte nossa base de conhecimento ou fale com nossa central de atendimento.\n\nAtenciosamente,\nEquipe de Suporte",
    "Prezado(a),\n\nAgradecemos seu email. Sua solicitação foi registrada em nosso sistema e será atendida por nossa equipe especializada.\n\nO prazo estimado para retorno é de até 24 horas úteis.\n\nAtenciosamente,\nEquipe Técnica",
    "Olá,\n\nRecebemos sua mensagem e entendemos a urgência da situação. Nossa equipe já está analisando o caso e providenciará uma solução o mais breve possível.\n\nAgradecemos sua paciência e compreensão.\n\nAtenciosamente,\nDepartamento de Suporte",
];

const UNPRODUCTIVE_POOL: &[&str] = &[
    "Olá,\n\nAgradecemos suas amáveis palavras e o carinho com nossa equipe!\n\nDesejamos a você também muito sucesso e felicidade.\n\nAtenciosamente,\nEquipe",
    "Prezado(a),\n\nMuito obrigado pelo seu contato e pelas gentis palavras.\n\nÉ um prazer tê-lo(a) em nossa comunidade!\n\nAtenciosamente,\nEquipe",
    "Olá,\n\nAgradecemos seu email e seus votos de felicidades!\n\nRetribuímos os sentimentos e desejamos tudo de bom para você e sua família.\n\nAtenciosamente,\nEquipe",
];

const SPECIALIZED: &[(&str, &str)] = &[
    (
        "natal",
        "Olá,\n\nAgradecemos seus votos de Feliz Natal!\n\nDesejamos a você e sua família um Natal repleto de alegria, paz e momentos especiais.\n\nAtenciosamente,\nEquipe",
    ),
    (
        "ano novo",
        "Olá,\n\nObrigado pelos votos de Ano Novo!\n\nQue o próximo ano traga ainda mais sucesso, saúde e felicidade para todos nós.\n\nAtenciosamente,\nEquipe",
    ),
    (
        "problema",
        "Olá,\n\nEntendemos que você está enfrentando um problema. Nossa equipe técnica já foi acionada e está trabalhando para resolver esta questão o mais rápido possível.\n\nAgradecemos sua paciência e compreensão.\n\nAtenciosamente,\nEquipe de Suporte Técnico",
    ),
    (
        "urgente",
        "Olá,\n\nIdentificamos a urgência de sua solicitação. Estamos priorizando seu caso e entraremos em contato em até 1 hora útil.\n\nAtenciosamente,\nEquipe de Suporte",
    ),
];

#[derive(Debug, Clone, Copy)]
pub struct ReplyTemplateSet {
    productive: &'static [&'static str],
    unproductive: &'static [&'static str],
    specialized: &'static [(&'static str, &'static str)],
}

impl Default for ReplyTemplateSet {
    fn default() -> Self {
        Self {
            productive: PRODUCTIVE_POOL,
            unproductive: UNPRODUCTIVE_POOL,
            specialized: SPECIALIZED,
        }
    }
}

impl ReplyTemplateSet {
    pub fn specialized_for(&self, text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        self.specialized
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, reply)| *reply)
    }

    pub fn pool(&self, category: Category) -> &'static [&'static str] {
        match category {
            Category::Produtivo => self.productive,
            Category::Improdutivo => self.unproductive,
        }
    }

    pub fn choose(&self, category: Category, text: &str, rng: &mut dyn RngCore) -> &'static str {
        if let Some(reply) = self.specialized_for(text) {
            return reply;
        }
        self.pool(category)
            .choose(rng)
            .copied()
            .unwrap_or_else(|| static_reply(category))
    }
}
