#![cfg(test)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use mockall::mock;
use weather_assistant::{
    base::{
        config::{Config, ConfigInner},
        error::{AssistantError, AssistantResult, Stage},
        types::{ChatMessage, ChatRole, ExtractedCity, FinalAnswer, Outcome, Res, UserQuery, WeatherSnapshot},
    },
    interaction::{ask::ask, compose_answer::compose_answer, extract_city::extract_city},
    runtime::Runtime,
    service::{
        llm::{GenericLlmClient, LlmClient},
        weather::{GenericWeatherClient, WeatherClient},
    },
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

// Mocks.

// Mock LLM client for testing.

mock! {
    pub Llm {}

    #[async_trait]
    impl GenericLlmClient for Llm {
        async fn chat(&self, messages: Vec<ChatMessage>) -> Res<Vec<String>>;
    }
}

// Mock weather client for testing.

mock! {
    pub Weather {}

    #[async_trait]
    impl GenericWeatherClient for Weather {
        async fn current_weather(&self, city: &ExtractedCity) -> AssistantResult<WeatherSnapshot>;
    }
}

/// An LLM that answers the extraction prompt at once and the answer prompt after `answer_delay`.
struct SlowLlm {
    city_reply: String,
    extraction_delay: Duration,
    answer_delay: Duration,
}

#[async_trait]
impl GenericLlmClient for SlowLlm {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Res<Vec<String>> {
        if messages.len() == 2 {
            tokio::time::sleep(self.extraction_delay).await;
            Ok(vec![self.city_reply.clone()])
        } else {
            tokio::time::sleep(self.answer_delay).await;
            Ok(vec!["Too late to matter.".to_string()])
        }
    }
}

const PARIS_QUESTION: &str = "What's the weather like in Paris?";
const PARIS_BODY: &str = r#"{"main":{"temp":18.5},"weather":[{"description":"clear sky"}],"name":"Paris"}"#;
const PARIS_SENTENCE: &str = "The current weather in Paris is clear sky with a temperature of 18.50°C.";

fn create_test_config(weather_base_url: &str) -> Config {
    Config {
        inner: Arc::new(ConfigInner {
            llm_api_key: "test_llm_key".to_string(),
            weather_api_key: "test_weather_key".to_string(),
            weather_base_url: weather_base_url.to_string(),
            llm_timeout_secs: 2,
            ..Default::default()
        }),
    }
}

fn paris_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        city_name: "Paris".to_string(),
        description: "clear sky".to_string(),
        temperature_celsius: 18.5,
    }
}

fn is_extraction_request(messages: &[ChatMessage]) -> bool {
    messages.len() == 2 && messages[0].role == ChatRole::System && messages[1].role == ChatRole::User
}

fn is_answer_request(messages: &[ChatMessage], sentence: &str) -> bool {
    messages.len() == 3
        && messages.iter().map(|m| m.role).collect::<Vec<_>>() == vec![ChatRole::System, ChatRole::System, ChatRole::User]
        && messages[1].content == sentence
        && messages[2].content == PARIS_QUESTION
}

/// Helper function to setup a runtime over mocked services.
fn setup_runtime(llm: impl GenericLlmClient, weather: impl GenericWeatherClient) -> Runtime {
    Runtime {
        config: create_test_config("http://127.0.0.1:1"),
        llm: LlmClient::new(Arc::new(llm)),
        weather: WeatherClient::new(Arc::new(weather)),
    }
}

/// Helper function to setup a runtime with the real OpenWeatherMap client against `server`.
fn setup_runtime_with_server(llm: impl GenericLlmClient, server: &MockServer) -> Runtime {
    let config = create_test_config(&server.uri());
    let weather = WeatherClient::openweather(&config).expect("Failed to create weather client");

    Runtime {
        config,
        llm: LlmClient::new(Arc::new(llm)),
        weather,
    }
}

fn weather_never_called() -> MockWeather {
    let mut weather = MockWeather::new();
    weather.expect_current_weather().never();
    weather
}

// End-to-end scenarios.

#[tokio::test]
async fn test_paris_question_is_answered_from_weather_context() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "test_weather_key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PARIS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let mut llm = MockLlm::new();
    llm.expect_chat()
        .withf(|messages| is_extraction_request(messages) && messages[1].content == PARIS_QUESTION)
        .times(1)
        .returning(|_| Ok(vec![r#"The city is "Paris"."#.to_string()]));
    llm.expect_chat()
        .withf(|messages| is_answer_request(messages, PARIS_SENTENCE))
        .times(1)
        .returning(|_| Ok(vec!["  It is clear and 18.5°C in Paris right now.\n".to_string()]));

    let runtime = setup_runtime_with_server(llm, &server);
    let outcome = ask(&runtime, &UserQuery::new(PARIS_QUESTION)).await.unwrap();

    assert_eq!(outcome, Outcome::Answered(FinalAnswer::new("It is clear and 18.5°C in Paris right now.")));
}

#[tokio::test]
async fn test_city_not_found_stops_before_composition() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"cod":"404","message":"city not found"}"#))
        .mount(&server)
        .await;

    let mut llm = MockLlm::new();
    llm.expect_chat().times(1).returning(|_| Ok(vec![r#"The city is "Atlantis"."#.to_string()]));

    let runtime = setup_runtime_with_server(llm, &server);
    let err = ask(&runtime, &UserQuery::new("How warm is it in Atlantis?")).await.unwrap_err();

    assert_eq!(err.stage, Stage::WeatherFetch);
    assert!(matches!(&err.source, AssistantError::Provider { status: 404, body } if body.contains("city not found")));
    assert!(err.to_string().starts_with("Error fetching weather data:"));
}

#[tokio::test]
async fn test_unquoted_reply_stops_before_weather_request() {
    let mut llm = MockLlm::new();
    llm.expect_chat().times(1).returning(|_| Ok(vec!["I'm not sure which city you mean.".to_string()]));

    let runtime = setup_runtime(llm, weather_never_called());
    let err = ask(&runtime, &UserQuery::new("Is it going to rain?")).await.unwrap_err();

    assert_eq!(err.stage, Stage::CityExtraction);
    assert!(matches!(err.source, AssistantError::ExtractionFailed));
}

#[tokio::test]
async fn test_blank_quoted_city_is_no_city_outcome() {
    let mut llm = MockLlm::new();
    llm.expect_chat().times(1).returning(|_| Ok(vec![r#"The city is "  "."#.to_string()]));

    let runtime = setup_runtime(llm, weather_never_called());
    let outcome = ask(&runtime, &UserQuery::new("What's it like outside?")).await.unwrap();

    assert_eq!(outcome, Outcome::NoCity);
}

#[tokio::test]
async fn test_weather_client_receives_trimmed_city() {
    let mut llm = MockLlm::new();
    llm.expect_chat().withf(|messages| is_extraction_request(messages)).returning(|_| Ok(vec![r#""  Paris  ""#.to_string()]));
    llm.expect_chat().withf(|messages| is_answer_request(messages, PARIS_SENTENCE)).returning(|_| Ok(vec!["Sunny.".to_string()]));

    let mut weather = MockWeather::new();
    weather
        .expect_current_weather()
        .withf(|city| city.as_str() == "Paris")
        .times(1)
        .returning(|_| Ok(paris_snapshot()));

    let runtime = setup_runtime(llm, weather);
    let outcome = ask(&runtime, &UserQuery::new(PARIS_QUESTION)).await.unwrap();

    assert_eq!(outcome, Outcome::Answered(FinalAnswer::new("Sunny.")));
}

#[tokio::test]
async fn test_malformed_weather_stops_before_composition() {
    let mut llm = MockLlm::new();
    llm.expect_chat().times(1).returning(|_| Ok(vec![r#""Paris""#.to_string()]));

    let mut weather = MockWeather::new();
    weather
        .expect_current_weather()
        .times(1)
        .returning(|_| Err(AssistantError::MalformedResponse("weather missing or invalid".to_string())));

    let runtime = setup_runtime(llm, weather);
    let err = ask(&runtime, &UserQuery::new(PARIS_QUESTION)).await.unwrap_err();

    assert_eq!(err.stage, Stage::WeatherFetch);
    assert!(matches!(err.source, AssistantError::MalformedResponse(message) if message == "weather missing or invalid"));
}

// Stage failures.

#[tokio::test]
async fn test_extraction_with_no_choices_is_empty_response() {
    let mut llm = MockLlm::new();
    llm.expect_chat().returning(|_| Ok(vec![]));

    let runtime = setup_runtime(llm, weather_never_called());
    let result = extract_city(&runtime, &UserQuery::new(PARIS_QUESTION), Duration::from_secs(1)).await;

    assert!(matches!(result, Err(AssistantError::EmptyResponse)));
}

#[tokio::test]
async fn test_extraction_surfaces_llm_failure() {
    let mut llm = MockLlm::new();
    llm.expect_chat().returning(|_| Err(anyhow::anyhow!("401 Unauthorized")));

    let runtime = setup_runtime(llm, weather_never_called());
    let err = ask(&runtime, &UserQuery::new(PARIS_QUESTION)).await.unwrap_err();

    assert_eq!(err.stage, Stage::CityExtraction);
    assert!(matches!(err.source, AssistantError::LlmService(_)));
}

#[tokio::test]
async fn test_extraction_sends_directive_then_question() {
    let mut llm = MockLlm::new();
    llm.expect_chat()
        .withf(|messages| {
            is_extraction_request(messages) && messages[0].content.contains("within quotes") && messages[1].content == "Weather in São Paulo?"
        })
        .returning(|_| Ok(vec![r#"Sure: "São Paulo""#.to_string()]));

    let runtime = setup_runtime(llm, weather_never_called());
    let city = extract_city(&runtime, &UserQuery::new("Weather in São Paulo?"), Duration::from_secs(1)).await.unwrap();

    assert_eq!(city, "São Paulo");
}

#[tokio::test]
async fn test_composition_with_no_choices_is_empty_response() {
    let mut llm = MockLlm::new();
    llm.expect_chat().withf(|messages| is_extraction_request(messages)).returning(|_| Ok(vec![r#""Paris""#.to_string()]));
    llm.expect_chat().withf(|messages| messages.len() == 3).returning(|_| Ok(vec![]));

    let mut weather = MockWeather::new();
    weather.expect_current_weather().returning(|_| Ok(paris_snapshot()));

    let runtime = setup_runtime(llm, weather);
    let err = ask(&runtime, &UserQuery::new(PARIS_QUESTION)).await.unwrap_err();

    assert_eq!(err.stage, Stage::ResponseComposition);
    assert!(matches!(err.source, AssistantError::EmptyResponse));
}

#[tokio::test]
async fn test_composition_uses_first_choice_trimmed() {
    let mut llm = MockLlm::new();
    llm.expect_chat()
        .withf(|messages| is_answer_request(messages, PARIS_SENTENCE))
        .returning(|_| Ok(vec!["\n First answer. ".to_string(), "Second answer.".to_string()]));

    let runtime = setup_runtime(llm, weather_never_called());
    let answer = compose_answer(&runtime, &UserQuery::new(PARIS_QUESTION), &paris_snapshot(), Duration::from_secs(1)).await.unwrap();

    assert_eq!(answer.as_str(), "First answer.");
}

// Deadlines.

#[tokio::test(start_paused = true)]
async fn test_slow_extraction_times_out() {
    let llm = SlowLlm {
        city_reply: r#""Paris""#.to_string(),
        extraction_delay: Duration::from_secs(60),
        answer_delay: Duration::ZERO,
    };

    let runtime = setup_runtime(llm, weather_never_called());

    let start = tokio::time::Instant::now();
    let err = ask(&runtime, &UserQuery::new(PARIS_QUESTION)).await.unwrap_err();
    let elapsed = start.elapsed();

    assert_eq!(err.stage, Stage::CityExtraction);
    assert!(matches!(err.source, AssistantError::Timeout));
    assert_eq!(err.to_string(), "Error extracting city: request timed out");
    assert!(elapsed < Duration::from_secs(3), "returned late: {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_slow_composition_times_out() {
    let llm = SlowLlm {
        city_reply: r#""Paris""#.to_string(),
        extraction_delay: Duration::from_millis(100),
        answer_delay: Duration::from_secs(60),
    };

    let mut weather = MockWeather::new();
    weather.expect_current_weather().times(1).returning(|_| Ok(paris_snapshot()));

    let runtime = setup_runtime(llm, weather);
    let err = ask(&runtime, &UserQuery::new(PARIS_QUESTION)).await.unwrap_err();

    assert_eq!(err.stage, Stage::ResponseComposition);
    assert!(matches!(err.source, AssistantError::Timeout));
}

#[tokio::test(start_paused = true)]
async fn test_call_just_inside_deadline_succeeds() {
    let llm = SlowLlm {
        city_reply: r#""Paris""#.to_string(),
        extraction_delay: Duration::from_millis(1900),
        answer_delay: Duration::ZERO,
    };

    let runtime = setup_runtime(llm, weather_never_called());
    let city = extract_city(&runtime, &UserQuery::new(PARIS_QUESTION), runtime.config.llm_deadline()).await.unwrap();

    assert_eq!(city, "Paris");
}
