//! Title candidate expansion for the primary provider.
//!
//! Candidate order for a dish name:
//!   1. the name itself, primary language
//!   2. the name with each disambiguation suffix, primary language
//!   3. every curated alias, fallback language
//!   4. the name itself, fallback language
//!
//! Putting the suffixed titles ahead of the curated aliases is a policy
//! choice, not a correctness requirement.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use platepic_common::TitleCandidate;

/// Curated cross-language titles for dishes whose Chinese article is
/// missing or has no lead image.
const BUILTIN_ALIASES: &[(&str, &[&str])] = &[
    ("宫保鸡丁", &["宫保雞丁", "Kung Pao chicken"]),
    ("麻婆豆腐", &["Mapo tofu"]),
    ("鱼香肉丝", &["魚香肉絲", "Yuxiang shredded pork"]),
    ("回锅肉", &["回鍋肉", "Twice-cooked pork"]),
    ("水煮鱼", &["水煮魚", "Shuizhu fish"]),
    ("白切鸡", &["白切雞", "White cut chicken", "Bai qie ji"]),
    ("豉汁蒸排骨", &["Steamed pork ribs with black bean sauce"]),
    ("清蒸鲈鱼", &["清蒸鱸魚", "Steamed sea bass", "Steamed perch"]),
    ("干炒牛河", &["干炒牛河粉", "Beef chow fun"]),
    ("叉烧", &["叉燒", "Char siu"]),
    ("松鼠桂鱼", &["Squirrel fish"]),
    ("红烧狮子头", &["Lion's head (food)"]),
    ("叫花鸡", &["Beggar's chicken"]),
    ("酱鸭", &["Soy-braised duck"]),
    ("西湖醋鱼", &["West Lake fish in vinegar gravy"]),
    ("东坡肉", &["Dongpo pork"]),
    ("龙井虾仁", &["Longjing shrimp"]),
    ("油焖春笋", &["Braised spring bamboo shoots"]),
    ("佛跳墙", &["Buddha Jumps Over the Wall"]),
    ("海蛎煎", &["Oyster omelette"]),
    ("卤面", &["Lǔ noodles", "Lumen (noodles)"]),
    ("荔枝肉", &["Litchi pork"]),
    ("剁椒鱼头", &["Steamed fish head with diced hot red peppers"]),
    ("毛氏红烧肉", &["Mao shi hongshao rou", "Hunan braised pork"]),
    ("辣椒炒肉", &["La Jiao Chao Rou", "Stir-fried pork with chili"]),
    ("口味虾", &["Spicy crayfish", "Mala crayfish"]),
    ("臭鳜鱼", &["臭桂魚", "Stinky mandarin fish"]),
    ("笋干烧肉", &["Braised pork with dried bamboo shoots"]),
    ("徽州一品锅", &["Hui-style yipin pot"]),
    ("毛豆腐", &["Fermented tofu (Mao tofu)"]),
    ("葱爆海参", &["Stir-fried sea cucumber with scallion"]),
    ("九转大肠", &["Jiu zhuan da chang", "Sweet and sour pork intestine"]),
    ("糖醋鲤鱼", &["Sweet and sour carp"]),
    ("四喜丸子", &["Four-Joy Meatballs", "Lion's head (food)"]),
];

#[derive(Debug, Clone)]
pub struct AliasConfig {
    pub primary_lang: String,
    pub fallback_lang: String,
    /// Appended to the name to disambiguate dish articles from homonyms.
    pub suffixes: Vec<String>,
    pub aliases: HashMap<String, Vec<String>>,
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            primary_lang: "zh".to_string(),
            fallback_lang: "en".to_string(),
            suffixes: vec!["（菜肴）".to_string(), "(菜肴)".to_string()],
            aliases: builtin_aliases(),
        }
    }
}

impl AliasConfig {
    /// Replace the alias table with one read from a JSON object of
    /// `name -> [alias, ...]`.
    pub fn with_alias_file(mut self, path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read alias file {}", path.display()))?;
        self.aliases = serde_json::from_str(&text)
            .with_context(|| format!("Alias file {} must map names to title lists", path.display()))?;
        Ok(self)
    }
}

pub fn builtin_aliases() -> HashMap<String, Vec<String>> {
    BUILTIN_ALIASES
        .iter()
        .map(|(name, titles)| {
            (
                name.to_string(),
                titles.iter().map(|t| t.to_string()).collect(),
            )
        })
        .collect()
}

pub struct AliasResolver {
    config: AliasConfig,
}

impl AliasResolver {
    pub fn new(config: AliasConfig) -> Self {
        Self { config }
    }

    pub fn candidates(&self, name: &str) -> Vec<TitleCandidate> {
        let primary = &self.config.primary_lang;
        let fallback = &self.config.fallback_lang;

        let mut out = vec![TitleCandidate::new(name, primary)];
        out.extend(
            self.config
                .suffixes
                .iter()
                .map(|suffix| TitleCandidate::new(format!("{name}{suffix}"), primary)),
        );
        if let Some(aliases) = self.config.aliases.get(name) {
            out.extend(aliases.iter().map(|alias| TitleCandidate::new(alias, fallback)));
        }
        out.push(TitleCandidate::new(name, fallback));
        out
    }
}
