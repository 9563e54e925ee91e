//! Category-to-model routing for Modelgate
//!
//! Maps each message category to a (provider, model) pair, a system prompt,
//! and a localized fallback response. The table is static configuration;
//! nothing here is computed at runtime.

use serde::{Deserialize, Serialize};

/// Message category
///
/// Closed set - unrecognized input is classified as `Text` at the boundary,
/// so downstream code never needs a defensive default branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Category {
    Code,
    Analysis,
    #[default]
    Text,
}

impl Category {
    /// Convert to string representation for logging, metrics labels, and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Analysis => "analysis",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(Self::Code),
            "analysis" => Ok(Self::Analysis),
            "text" => Ok(Self::Text),
            other => Err(crate::error::AppError::Validation(format!(
                "unknown category '{other}', expected one of: code, analysis, text"
            ))),
        }
    }
}

/// External LLM vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    /// Convert to string representation for logging and metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }
}

/// A resolved routing target: which provider and model serve a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelRoute {
    pub provider: Provider,
    pub model: &'static str,
}

impl ModelRoute {
    /// Select the model for a category
    ///
    /// Total over [`Category`]; the same category always yields the same route.
    ///
    /// | category | provider  | model                        |
    /// |----------|-----------|------------------------------|
    /// | code     | openai    | gpt-4o                       |
    /// | analysis | anthropic | claude-3-5-sonnet-20241022   |
    /// | text     | openai    | gpt-4o-mini                  |
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Code => Self {
                provider: Provider::OpenAi,
                model: "gpt-4o",
            },
            Category::Analysis => Self {
                provider: Provider::Anthropic,
                model: "claude-3-5-sonnet-20241022",
            },
            Category::Text => Self {
                provider: Provider::OpenAi,
                model: "gpt-4o-mini",
            },
        }
    }
}

/// System prompt used to prime the model for a category
pub fn system_prompt(category: Category) -> &'static str {
    match category {
        Category::Code => {
            "Ты - экспертный программист и ИИ-помощник. Специализируешься на:\n\
             - Генерации качественного кода на любых языках программирования\n\
             - Создании архитектурных решений\n\
             - Объяснении сложных концепций программирования\n\
             - Написании чистого, оптимизированного кода с комментариями\n\
             \n\
             Всегда предоставляй рабочий код с объяснениями. Используй современные практики и паттерны."
        }
        Category::Analysis => {
            "Ты - эксперт по анализу кода и code review. Специализируешься на:\n\
             - Поиске багов и уязвимостей в коде\n\
             - Оптимизации производительности\n\
             - Проверке соответствия best practices\n\
             - Рекомендациях по улучшению архитектуры\n\
             - Анализе безопасности кода\n\
             \n\
             Предоставляй детальный анализ с конкретными рекомендациями и примерами исправлений."
        }
        Category::Text => {
            "Ты - эксперт по техническому письму и документации. Специализируешься на:\n\
             - Создании технической документации\n\
             - Написании README файлов\n\
             - Создании руководств и инструкций\n\
             - Написании технических статей\n\
             - Создании комментариев к коду\n\
             \n\
             Пиши ясно, структурированно и информативно. Используй примеры и конкретные рекомендации."
        }
    }
}

/// Localized apology returned in place of a real answer when the upstream
/// provider call fails
pub fn fallback_response(category: Category) -> &'static str {
    match category {
        Category::Code => {
            "Извините, сервис ИИ временно недоступен. Попробуйте позже или задайте более \
             конкретный вопрос по программированию."
        }
        Category::Analysis => {
            "Извините, сервис анализа кода временно недоступен. Пожалуйста, попробуйте позже."
        }
        Category::Text => {
            "Извините, сервис генерации текста временно недоступен. Попробуйте повторить \
             запрос через несколько минут."
        }
    }
}
