//! OpenAPI description of the REST surface.
//!
//! Payload schemas are derived from the response types with schemars, so the
//! document cannot drift from what the handlers serialize.

use schemars::generate::SchemaSettings;
use schemars::{JsonSchema, SchemaGenerator};
use serde_json::{Value, json};
use tracing::instrument;

use crate::games::memory::{GameHistory, GameStateView, LeaderboardEntry, RoundOutcome};
use crate::server::{ErrorBody, PlayRoundRequest};
use crate::service::{GAME_CREATED_MESSAGE, GameCreated};

/// Path at which the document is served.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

const EXAMPLE_GAME_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

/// Builds the OpenAPI 3.0 document for every game route.
#[instrument]
pub fn openapi_document() -> Value {
    let mut generator = SchemaSettings::openapi3().into_generator();

    let created = schema::<GameCreated>(&mut generator);
    let outcome = schema::<RoundOutcome>(&mut generator);
    let state = schema::<GameStateView>(&mut generator);
    let history = schema::<GameHistory>(&mut generator);
    let leaderboard = schema::<Vec<LeaderboardEntry>>(&mut generator);
    let request = schema::<PlayRoundRequest>(&mut generator);
    let error = schema::<ErrorBody>(&mut generator);

    let not_found = response("Game not found", error.clone());
    let game_id = json!({
        "name": "gameId",
        "in": "path",
        "required": true,
        "description": "The unique game identifier",
        "schema": { "type": "string" },
        "example": EXAMPLE_GAME_ID
    });

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Memory Match API",
            "description": "Find the eight animal pairs on a hidden 4x4 board.",
            "version": env!("CARGO_PKG_VERSION")
        },
        "tags": [{ "name": "game" }],
        "paths": {
            "/game/new": {
                "post": {
                    "tags": ["game"],
                    "summary": "Create a new game",
                    "description": "Creates a game with a shuffled 4x4 board of 8 animal pairs.",
                    "responses": {
                        "201": with_example(
                            response("Game created successfully", created),
                            json!({ "gameId": EXAMPLE_GAME_ID, "message": GAME_CREATED_MESSAGE })
                        )
                    }
                }
            },
            "/game/{gameId}/play": {
                "post": {
                    "tags": ["game"],
                    "summary": "Play a round",
                    "description": "Flips two cards and reports whether they match.",
                    "parameters": [game_id.clone()],
                    "requestBody": {
                        "required": true,
                        "description": "Two card positions to flip",
                        "content": {
                            "application/json": {
                                "schema": request,
                                "example": { "position1": "A1", "position2": "B2" }
                            }
                        }
                    },
                    "responses": {
                        "201": with_example(
                            response("Round played successfully", outcome),
                            json!({
                                "isMatch": false,
                                "card1": { "position": "A1", "value": "cat" },
                                "card2": { "position": "B2", "value": "dog" },
                                "gameCompleted": false,
                                "attemptNumber": 3
                            })
                        ),
                        "400": with_example(
                            response("Invalid input or game already completed", error.clone()),
                            json!({
                                "statusCode": 400,
                                "message": "Cannot select the same card twice",
                                "error": "Bad Request"
                            })
                        ),
                        "404": not_found.clone(),
                        "409": response("Another round on this game was saved first", error)
                    }
                }
            },
            "/game/leaderboard": {
                "get": {
                    "tags": ["game"],
                    "summary": "Get leaderboard",
                    "description": "Top 5 completed games, fewest attempts first.",
                    "responses": {
                        "200": response("Leaderboard retrieved successfully", leaderboard)
                    }
                }
            },
            "/game/{gameId}": {
                "get": {
                    "tags": ["game"],
                    "summary": "Get game state",
                    "description": "Current state of a game. Unmatched cards are not revealed.",
                    "parameters": [game_id.clone()],
                    "responses": {
                        "200": response("Game state retrieved successfully", state),
                        "404": not_found.clone()
                    }
                }
            },
            "/game/{gameId}/history": {
                "get": {
                    "tags": ["game"],
                    "summary": "Get game history",
                    "description": "Every accepted round of a game, oldest first.",
                    "parameters": [game_id],
                    "responses": {
                        "200": response("History retrieved successfully", history),
                        "404": not_found
                    }
                }
            }
        },
        "components": {
            "schemas": generator.definitions().clone()
        }
    })
}

fn schema<T: JsonSchema>(generator: &mut SchemaGenerator) -> Value {
    generator.subschema_for::<T>().to_value()
}

fn response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn with_example(mut response: Value, example: Value) -> Value {
    response["content"]["application/json"]["example"] = example;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_resolve_to_components() {
        let doc = openapi_document();
        let schemas = doc["components"]["schemas"].as_object().unwrap();
        for name in ["GameCreated", "RoundOutcome", "GameStateView", "GameHistory"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }

        let text = doc.to_string();
        for reference in text.split("\"$ref\":\"").skip(1) {
            let target = reference.split('"').next().unwrap();
            let name = target.trim_start_matches("#/components/schemas/");
            assert!(schemas.contains_key(name), "dangling reference {target}");
        }
    }

    #[test]
    fn position_schema_carries_pattern() {
        let doc = openapi_document();
        assert_eq!(
            doc["components"]["schemas"]["Position"]["pattern"],
            "^[A-D][1-4]$"
        );
    }
}
