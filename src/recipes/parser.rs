//! Turns the free-form text of an AI recipe reply into structured fields.
//!
//! Replies are expected to roughly follow the layout requested by the
//! prompt (`Meal Name:`, `Ingredients:`, `Steps:`, `Nutrients:`) but models
//! add markdown, numbering and extra prose, so the scanner is lenient: labels
//! are matched case-insensitively, list markers and emphasis are stripped and
//! unknown lines are attributed to the current section.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeNutrients {
    pub calories: Option<f64>,
    pub carbs_g: Option<f64>,
    pub protein_g: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecipe {
    pub meal_name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub nutrients: RecipeNutrients,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecipeParseError {
    #[error("recipe reply has no meal name")]
    MissingName,
    #[error("recipe reply lists no ingredients")]
    MissingIngredients,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Name,
    Ingredients,
    Steps,
    Nutrients,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Name,
    Ingredients,
    Steps,
    Nutrients,
    Calories,
    Carbs,
    Protein,
}

lazy_static! {
    static ref LABEL_RE: Regex = Regex::new(r"^([A-Za-z][A-Za-z ]*?)\s*(?::\s*(.*))?$").unwrap();
    static ref MARKER_RE: Regex =
        Regex::new(r"(?i)^(?:[-*•]\s+|\d+[.)]\s+|step\s*\d+\s*[:.)-]\s*)(.*)$").unwrap();
    static ref RANGE_RE: Regex =
        Regex::new(r"^(\d+(?:\.\d+)?)\s*(?:-|–|to)\s*(\d+(?:\.\d+)?)").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"\d+(?:\.\d+)?").unwrap();
}

fn label_kind(word: &str) -> Option<Label> {
    let kind = match word.trim().to_lowercase().as_str() {
        "meal name" | "name" | "recipe" | "recipe name" | "meal" | "dish" | "dish name" => {
            Label::Name
        }
        "ingredients" | "ingredient list" => Label::Ingredients,
        "steps" | "instructions" | "directions" | "method" | "preparation" => Label::Steps,
        "nutrients" | "nutrition" | "nutritional information" | "nutrition facts"
        | "nutritional values" | "estimated nutrients" => Label::Nutrients,
        "calories" | "energy" | "total calories" => Label::Calories,
        "carbohydrates" | "carbohydrate" | "carbs" => Label::Carbs,
        "protein" | "proteins" => Label::Protein,
        _ => return None,
    };
    Some(kind)
}

fn split_label(line: &str) -> Option<(Label, &str)> {
    let caps = LABEL_RE.captures(line)?;
    let kind = label_kind(caps.get(1)?.as_str())?;
    let rest = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
    Some((kind, rest))
}

fn clean(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('#')
        .replace("**", "")
        .replace("__", "")
        .trim()
        .to_string()
}

fn strip_marker(line: &str) -> Option<&str> {
    MARKER_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// First number in `text`; when that number opens a range such as
/// `400-500` the midpoint is returned.
pub fn parse_amount(text: &str) -> Option<f64> {
    let first = NUMBER_RE.find(text)?;
    if let Some(c) = RANGE_RE.captures(&text[first.start()..]) {
        let lo: f64 = c[1].parse().ok()?;
        let hi: f64 = c[2].parse().ok()?;
        return Some((lo + hi) / 2.0);
    }
    first.as_str().parse().ok()
}

pub fn parse_recipe(text: &str) -> Result<ParsedRecipe, RecipeParseError> {
    let mut name: Option<String> = None;
    // a labelled name overrides a guessed leading title, never the reverse
    let mut name_labelled = false;
    let mut ingredients = Vec::new();
    let mut steps = Vec::new();
    let mut nutrients = RecipeNutrients::default();
    let mut section = Section::None;

    for raw in text.lines() {
        let line = clean(raw);
        if line.is_empty() {
            continue;
        }
        let body = strip_marker(&line).unwrap_or(&line);
        if body.is_empty() {
            continue;
        }

        if let Some((label, rest)) = split_label(body) {
            match label {
                Label::Name => {
                    if rest.is_empty() {
                        section = Section::Name;
                    } else {
                        if !name_labelled {
                            name = Some(rest.to_string());
                            name_labelled = true;
                        }
                        section = Section::None;
                    }
                }
                Label::Ingredients => {
                    section = Section::Ingredients;
                    ingredients.extend(
                        rest.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from),
                    );
                }
                Label::Steps => {
                    section = Section::Steps;
                    if !rest.is_empty() {
                        steps.push(rest.to_string());
                    }
                }
                Label::Nutrients => section = Section::Nutrients,
                Label::Calories => nutrients.calories = parse_amount(rest),
                Label::Carbs => nutrients.carbs_g = parse_amount(rest),
                Label::Protein => nutrients.protein_g = parse_amount(rest),
            }
            continue;
        }

        match section {
            Section::Name => {
                if !name_labelled {
                    name = Some(body.to_string());
                    name_labelled = true;
                }
                section = Section::None;
            }
            Section::Ingredients => ingredients.push(body.to_string()),
            Section::Steps => steps.push(body.to_string()),
            Section::Nutrients => {}
            Section::None => {
                // a leading bare title line
                if name.is_none() && ingredients.is_empty() && steps.is_empty() {
                    name = Some(body.to_string());
                }
            }
        }
    }

    let meal_name = name
        .map(|n| n.trim_end_matches(':').trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or(RecipeParseError::MissingName)?;
    if ingredients.is_empty() {
        return Err(RecipeParseError::MissingIngredients);
    }

    Ok(ParsedRecipe {
        meal_name,
        ingredients,
        steps,
        nutrients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = "Meal Name: Paneer Bhurji Wrap
Ingredients:
- 100 g paneer
- 1 whole wheat roti
- 1 onion, chopped
Steps:
1. Crumble the paneer.
2. Saute onion, add paneer and spices.
3. Fill the roti and roll.
Nutrients:
Calories: 420 kcal
Carbohydrates: 35 g
Protein: 24 g
";

    #[test]
    fn parses_plain_layout() {
        let r = parse_recipe(PLAIN).unwrap();
        assert_eq!(r.meal_name, "Paneer Bhurji Wrap");
        assert_eq!(
            r.ingredients,
            vec!["100 g paneer", "1 whole wheat roti", "1 onion, chopped"]
        );
        assert_eq!(r.steps.len(), 3);
        assert_eq!(r.steps[0], "Crumble the paneer.");
        assert_eq!(
            r.nutrients,
            RecipeNutrients {
                calories: Some(420.0),
                carbs_g: Some(35.0),
                protein_g: Some(24.0),
            }
        );
    }

    #[test]
    fn parses_markdown_layout() {
        let text = "## **Meal Name:**\nLemon Quinoa Bowl\n\n### Ingredients\n* 1 cup quinoa\n* 1 lemon\n\n### Instructions\nStep 1: Rinse quinoa.\nStep 2: Cook for 15 minutes.\n\n**Nutrition**\n- **Calories:** 350-400 kcal\n- **Carbs:** 60g\n- **Protein:** 12.5 g\n";
        let r = parse_recipe(text).unwrap();
        assert_eq!(r.meal_name, "Lemon Quinoa Bowl");
        assert_eq!(r.ingredients, vec!["1 cup quinoa", "1 lemon"]);
        assert_eq!(r.steps, vec!["Rinse quinoa.", "Cook for 15 minutes."]);
        assert_eq!(r.nutrients.calories, Some(375.0));
        assert_eq!(r.nutrients.carbs_g, Some(60.0));
        assert_eq!(r.nutrients.protein_g, Some(12.5));
    }

    #[test]
    fn bare_title_and_inline_ingredients() {
        let text = "Masala Oats\nIngredients: oats, peas, carrot\nMethod: Cook everything together.";
        let r = parse_recipe(text).unwrap();
        assert_eq!(r.meal_name, "Masala Oats");
        assert_eq!(r.ingredients, vec!["oats", "peas", "carrot"]);
        assert_eq!(r.steps, vec!["Cook everything together."]);
        assert_eq!(r.nutrients, RecipeNutrients::default());
    }

    #[test]
    fn missing_parts_are_errors() {
        assert_eq!(parse_recipe(""), Err(RecipeParseError::MissingName));
        assert_eq!(
            parse_recipe("Meal Name: Toast\nSteps:\n1. Toast bread"),
            Err(RecipeParseError::MissingIngredients)
        );
    }

    #[test]
    fn amounts() {
        assert_eq!(parse_amount("about 450 kcal"), Some(450.0));
        assert_eq!(parse_amount("20 to 30 g"), Some(25.0));
        assert_eq!(parse_amount("n/a"), None);
    }

    #[test]
    fn later_range_does_not_replace_first_number() {
        assert_eq!(parse_amount("24 g per serving (serves 2-3)"), Some(24.0));
        assert_eq!(parse_amount("~ 350 – 450 kcal"), Some(400.0));
    }

    #[test]
    fn labelled_name_wins_over_leading_prose() {
        let r = parse_recipe(
            "Here is a recipe for you:\nMeal Name: Veg Soup\nIngredients:\n- carrot\nSteps:\n1. Boil",
        )
        .unwrap();
        assert_eq!(r.meal_name, "Veg Soup");
        assert_eq!(r.ingredients, vec!["carrot"]);
        assert_eq!(r.steps, vec!["Boil"]);

        let r = parse_recipe("Sure thing!\n**Recipe:**\nDal Tadka\nIngredients: lentils").unwrap();
        assert_eq!(r.meal_name, "Dal Tadka");
    }

    #[test]
    fn decimal_quantities_are_not_list_markers() {
        let r = parse_recipe("Meal Name: Rice Bowl\nIngredients:\n1.5 cups rice\n2) 1 tsp salt").unwrap();
        assert_eq!(r.ingredients, vec!["1.5 cups rice", "1 tsp salt"]);
    }
}
