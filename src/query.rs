//! Search query building from selected recipe facets
//!
//! The user picks at most one value per facet. The selection is flattened into a
//! single descriptive string such as `"Cuisine: Italian, Diet: Vegetarian"`,
//! which is what gets sent to the image search API and used as the cache key.

/// A selectable recipe attribute category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Cuisine,
    CookingTime,
    CookingFor,
    Complexity,
    Diet,
}

impl Facet {
    /// All facets in query order
    pub const ALL: [Facet; 5] = [
        Facet::Cuisine,
        Facet::CookingTime,
        Facet::CookingFor,
        Facet::Complexity,
        Facet::Diet,
    ];

    /// Label used as the facet prefix inside the query string
    pub fn label(&self) -> &'static str {
        match self {
            Facet::Cuisine => "Cuisine",
            Facet::CookingTime => "Cooking Time",
            Facet::CookingFor => "Cooking For",
            Facet::Complexity => "Complexity",
            Facet::Diet => "Diet",
        }
    }

    /// Suggested values for this facet
    ///
    /// These are the choices offered by the picker. Any other value is still
    /// accepted when building a query.
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            Facet::Cuisine => &[
                "Chinese",
                "Indian",
                "French",
                "Italian",
                "Japanese",
                "Spanish",
                "Greek",
                "Mexican",
                "UK",
                "Bangladesh",
            ],
            Facet::CookingTime => &[
                "Less than 30 min",
                "Less than 1 hour",
                "1 to 2 hours",
                "Doesn't matter",
            ],
            Facet::CookingFor => &["Myself", "Family", "Date", "Party", "Children"],
            Facet::Complexity => &["Basic", "Medium", "Complex"],
            Facet::Diet => &["Omnivore", "Vegetarian", "No Veg"],
        }
    }
}

/// The user's current pick for every facet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSelection {
    pub cuisine: Option<String>,
    pub cooking_time: Option<String>,
    pub cooking_for: Option<String>,
    pub complexity: Option<String>,
    pub diet: Option<String>,
}

impl FacetSelection {
    /// Returns the selected value for a facet, if any
    pub fn get(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Cuisine => self.cuisine.as_deref(),
            Facet::CookingTime => self.cooking_time.as_deref(),
            Facet::CookingFor => self.cooking_for.as_deref(),
            Facet::Complexity => self.complexity.as_deref(),
            Facet::Diet => self.diet.as_deref(),
        }
    }

    /// Sets or clears the value for a facet
    pub fn set(&mut self, facet: Facet, value: Option<String>) {
        let slot = match facet {
            Facet::Cuisine => &mut self.cuisine,
            Facet::CookingTime => &mut self.cooking_time,
            Facet::CookingFor => &mut self.cooking_for,
            Facet::Complexity => &mut self.complexity,
            Facet::Diet => &mut self.diet,
        };
        *slot = value;
    }

    /// Returns true when no facet has a value
    pub fn is_empty(&self) -> bool {
        Facet::ALL.iter().all(|facet| self.get(*facet).is_none())
    }

    /// Builds the search query string
    ///
    /// Each selected facet becomes `"<Label>: <value>"`, joined with `", "` in
    /// the fixed [`Facet::ALL`] order. Unselected facets are left out, so an
    /// empty selection yields an empty string.
    pub fn build_query(&self) -> String {
        Facet::ALL
            .iter()
            .filter_map(|facet| {
                self.get(*facet)
                    .map(|value| format!("{}: {}", facet.label(), value))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
