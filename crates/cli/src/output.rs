use dishbook_core::dish::Dish;

/// Text or JSON rendering of command results.
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn dishes(&self, dishes: &[Dish]) {
        if self.json {
            println!("{}", serde_json::json!(dishes));
            return;
        }
        if dishes.is_empty() {
            println!("No dishes found.");
            return;
        }
        for dish in dishes {
            println!("{}  {}  ({})", dish.id, dish.dish_name, dish.ingredients_text());
        }
    }

    pub fn dish(&self, dish: &Dish) {
        if self.json {
            println!("{}", serde_json::json!(dish));
            return;
        }
        println!("{}", dish.dish_name);
        println!("  id:          {}", dish.id);
        println!("  ingredients: {}", dish.ingredients_text());
        println!("  image:       {}", dish.image_url.as_deref().unwrap_or("-"));
        println!("  notes:       {}", dish.notes_or_placeholder());
        println!("  created:     {}", dish.created_at.format("%Y-%m-%d %H:%M"));
    }

    pub fn message(&self, message: &str) {
        if self.json {
            println!("{}", serde_json::json!({ "message": message }));
        } else {
            println!("{message}");
        }
    }
}
