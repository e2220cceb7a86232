use crate::core::gateway::ItineraryRequest;

pub(crate) const SYSTEM_INSTRUCTION: &str = "\
You are an expert travel planner and local guide tailored for Chinese travelers.
Your goal is to create highly detailed, realistic, and exciting travel itineraries in Simplified Chinese (简体中文).
You adhere to the user's budget and interests.
Return the response in strictly valid JSON format.
Ensure the 'budget_breakdown' adds up to a realistic total estimation for the trip duration (excluding international flights, focusing on local spend).
For 'budget_breakdown', provide 4-5 categories (e.g., 住宿, 餐饮, 交通, 活动/门票).
All text values must be in Chinese.";

const DEFAULT_INTERESTS: &str = "general sightseeing";

/// User turn for the itinerary call.
pub(crate) fn itinerary_prompt(request: &ItineraryRequest) -> String {
    let interests = if request.interests.is_empty() {
        DEFAULT_INTERESTS.to_string()
    } else {
        request.interests.join(", ")
    };

    format!(
        "Create a {}-day trip to {} for {}.\n\
         Budget Level: {}.\n\
         Interests: {}.\n\
         \n\
         Provide a day-by-day itinerary.\n\
         Include specific times, real location names, and descriptive activities.\n\
         Include a packing list relevant to the destination and activities.\n\
         Provide a budget breakdown estimation in CNY (人民币).\n\
         Ensure all content is in Simplified Chinese.",
        request.duration_days,
        request.destination.trim(),
        request.travelers.as_str(),
        request.budget_level.as_str(),
        interests
    )
}

/// The "vibe" handed to the image model, derived from the generated title.
pub(crate) fn hero_vibe(trip_title: &str) -> String {
    format!("{} travel vibes", trip_title)
}

pub(crate) fn hero_image_prompt(destination: &str, vibe: &str) -> String {
    format!(
        "A breathtaking, cinematic, high-resolution wide shot of {}, capturing a {} atmosphere. \
         Professional travel photography, golden hour light, photorealistic, 4k.",
        destination, vibe
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BudgetLevel, TravelerGroup};

    fn request(interests: Vec<String>) -> ItineraryRequest {
        ItineraryRequest {
            destination: "京都".to_string(),
            duration_days: 4,
            budget_level: BudgetLevel::Luxury,
            interests,
            travelers: TravelerGroup::Family,
        }
    }

    #[test]
    fn test_itinerary_prompt_carries_preferences() {
        let prompt = itinerary_prompt(&request(vec!["历史文化".into(), "美食探店".into()]));
        assert!(prompt.starts_with("Create a 4-day trip to 京都 for Family with Kids."));
        assert!(prompt.contains("Budget Level: Luxury."));
        assert!(prompt.contains("Interests: 历史文化, 美食探店."));
        assert!(prompt.contains("CNY"));
    }

    #[test]
    fn test_itinerary_prompt_defaults_interests() {
        let prompt = itinerary_prompt(&request(vec![]));
        assert!(prompt.contains("Interests: general sightseeing."));
    }

    #[test]
    fn test_hero_prompt_uses_title_vibe() {
        let prompt = hero_image_prompt("东京", &hero_vibe("东京三日游"));
        assert!(prompt.contains("wide shot of 东京, capturing a 东京三日游 travel vibes atmosphere."));
    }
}
