use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::values::{
    ColorValue, DimensionValue, ShadowValue, StrokeStyleValue, TransitionValue, TypographyValue,
};

/// Closed set of token types; determines the shape of [`TokenValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    Dimension,
    Typography,
    StrokeStyle,
    Shadow,
    Transition,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TokenType::Color => "color",
                TokenType::Dimension => "dimension",
                TokenType::Typography => "typography",
                TokenType::StrokeStyle => "strokeStyle",
                TokenType::Shadow => "shadow",
                TokenType::Transition => "transition",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    Color(ColorValue),
    Typography(TypographyValue),
    Shadow(ShadowValue),
    Transition(TransitionValue),
    Dimension(DimensionValue),
    StrokeStyle(String),
}

impl TokenValue {
    pub fn token_type(&self) -> TokenType {
        match self {
            TokenValue::Color(_) => TokenType::Color,
            TokenValue::Dimension(_) => TokenType::Dimension,
            TokenValue::Typography(_) => TokenType::Typography,
            TokenValue::StrokeStyle(_) => TokenType::StrokeStyle,
            TokenValue::Shadow(_) => TokenType::Shadow,
            TokenValue::Transition(_) => TokenType::Transition,
        }
    }
}

impl From<ColorValue> for TokenValue {
    fn from(value: ColorValue) -> Self {
        TokenValue::Color(value)
    }
}

impl From<DimensionValue> for TokenValue {
    fn from(value: DimensionValue) -> Self {
        TokenValue::Dimension(value)
    }
}

impl From<StrokeStyleValue> for TokenValue {
    fn from(value: StrokeStyleValue) -> Self {
        TokenValue::StrokeStyle(value.0)
    }
}

impl From<TypographyValue> for TokenValue {
    fn from(value: TypographyValue) -> Self {
        TokenValue::Typography(value)
    }
}

impl From<ShadowValue> for TokenValue {
    fn from(value: ShadowValue) -> Self {
        TokenValue::Shadow(value)
    }
}

impl From<TransitionValue> for TokenValue {
    fn from(value: TransitionValue) -> Self {
        TokenValue::Transition(value)
    }
}

/// The universal output unit of every category extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedToken {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub name: String,
    pub category: String,
    pub value: TokenValue,
    /// Number of distinct pages the value was observed on.
    pub usage_count: usize,
    pub source_urls: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExtractedToken {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        value: impl Into<TokenValue>,
        source_urls: BTreeSet<String>,
    ) -> Self {
        let value = value.into();
        Self {
            token_type: value.token_type(),
            name: name.into(),
            category: category.into(),
            value,
            usage_count: source_urls.len(),
            source_urls,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}
