use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quill_client::{
    AuthResponse, NewParagraph, NewPost, Paragraph, Post, PostDetail, PostListQuery, PostUpdate,
    QuillClient, QuillClientError, Topic, User, Uuid,
};
use serde::Serialize;

const TOKEN_FILE: &str = ".quill_token";
const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";
const SERVER_ENV: &str = "QUILL_SERVER";

#[derive(Debug, Parser)]
#[command(name = "quill-cli", version, about = "CLI клиент для quill-server")]
struct Cli {
    /// Адрес сервера (по умолчанию QUILL_SERVER или http://127.0.0.1:8080).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Печатать ответы сервера в JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Проверка сохранённого токена.
    Check,
    /// Смена имени пользователя (требует токен).
    Rename {
        #[arg(long)]
        username: String,
    },
    /// Смена пароля (требует токен).
    Passwd {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
    /// Работа с темами.
    #[command(subcommand)]
    Topics(TopicCommand),
    /// Создание поста (требует токен).
    ///
    /// Блоки задаются как `--paragraph тип:содержимое`; без типа блок
    /// считается текстовым.
    Create {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        image_url: String,
        #[arg(long = "paragraph", value_parser = parse_paragraph)]
        paragraphs: Vec<NewParagraph>,
    },
    /// Получение поста по uuid.
    Get {
        #[arg(long)]
        uuid: Uuid,
    },
    /// Обновление поста (требует токен).
    ///
    /// Неуказанные поля берутся из текущей версии поста.
    Update {
        #[arg(long)]
        uuid: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        text: Option<String>,
    },
    /// Удаление поста (требует токен).
    Delete {
        #[arg(long)]
        uuid: Uuid,
    },
    /// Лента постов.
    List {
        #[arg(long)]
        cursor: Option<i64>,
        /// Листать к более новым постам относительно курсора.
        #[arg(long)]
        recent: bool,
        #[arg(long)]
        topic: Option<String>,
    },
    /// Поиск постов по заголовку.
    Search {
        #[arg(long, short)]
        query: String,
    },
    /// Лайк поста (требует токен).
    Like {
        #[arg(long)]
        uuid: Uuid,
    },
    /// Добавление блока в пост (требует токен).
    AddParagraph {
        #[arg(long)]
        post: Uuid,
        #[arg(long = "type", default_value = "text")]
        kind: String,
        #[arg(long)]
        content: String,
    },
    /// Удаление блока (требует токен).
    DeleteParagraph {
        #[arg(long)]
        uuid: Uuid,
    },
    /// Профиль пользователя по uuid.
    User {
        #[arg(long)]
        uuid: Uuid,
    },
    /// Посты текущего пользователя (требует токен).
    MyPosts,
}

#[derive(Debug, Subcommand)]
enum TopicCommand {
    /// Список тем.
    List,
    /// Тема по slug.
    Get {
        #[arg(long)]
        url: String,
    },
    /// Создание темы (требует токен).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        url: Option<String>,
    },
    /// Темы текущего пользователя (требует токен).
    Mine,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = resolve_server(cli.server, std::env::var(SERVER_ENV).ok());
    let mut client = QuillClient::new(server).map_err(map_client_error)?;
    let out = Output { json: cli.json };

    if let Some(token) = load_token().context("не удалось прочитать .quill_token")? {
        client.set_token(token);
    }

    match cli.command {
        Command::Register { username, password } => {
            let auth = client
                .register(&username, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            out.auth("Регистрация успешна", &auth)?;
        }
        Command::Login { username, password } => {
            let auth = client
                .login(&username, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            out.auth("Вход выполнен", &auth)?;
        }
        Command::Check => {
            let user = client.check().await.map_err(map_client_error)?;
            out.user("Токен действителен", &user)?;
        }
        Command::Rename { username } => {
            let auth = client
                .update_username(&username)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            out.auth("Имя изменено", &auth)?;
        }
        Command::Passwd { current, new } => {
            client
                .change_password(&current, &new)
                .await
                .map_err(map_client_error)?;
            println!("Пароль изменён");
        }
        Command::Topics(command) => run_topic_command(&client, &out, command).await?,
        Command::Create {
            topic,
            title,
            description,
            image_url,
            paragraphs,
        } => {
            let post = NewPost {
                topic,
                title,
                description,
                image_url,
                paragraphs,
            };
            let created = client.create_post(&post).await.map_err(map_client_error)?;
            out.detail("Пост создан", &created)?;
        }
        Command::Get { uuid } => {
            let post = client.get_post(uuid).await.map_err(map_client_error)?;
            out.detail("Пост", &post)?;
        }
        Command::Update {
            uuid,
            title,
            description,
            text,
        } => {
            // сервер заменяет поля целиком
            let current = client.get_post(uuid).await.map_err(map_client_error)?.post;
            let update = merge_update(&current, title, description, text);

            let post = client
                .update_post(uuid, &update)
                .await
                .map_err(map_client_error)?;
            out.post("Пост обновлён", &post)?;
        }
        Command::Delete { uuid } => {
            client.delete_post(uuid).await.map_err(map_client_error)?;
            println!("Пост удалён: uuid={uuid}");
        }
        Command::List {
            cursor,
            recent,
            topic,
        } => {
            let query = PostListQuery {
                cursor,
                recent,
                topic,
            };
            let posts = client.list_posts(&query).await.map_err(map_client_error)?;
            out.posts(&posts)?;
        }
        Command::Search { query } => {
            let posts = client
                .search_posts(&query)
                .await
                .map_err(map_client_error)?;
            out.posts(&posts)?;
        }
        Command::Like { uuid } => {
            let post = client.like_post(uuid).await.map_err(map_client_error)?;
            out.post("Лайк поставлен", &post)?;
        }
        Command::AddParagraph {
            post,
            kind,
            content,
        } => {
            let paragraph = client
                .append_paragraph(post, &NewParagraph { kind, content })
                .await
                .map_err(map_client_error)?;
            out.paragraph("Блок добавлен", &paragraph)?;
        }
        Command::DeleteParagraph { uuid } => {
            client
                .delete_paragraph(uuid)
                .await
                .map_err(map_client_error)?;
            println!("Блок удалён: uuid={uuid}");
        }
        Command::User { uuid } => {
            let user = client.get_user(uuid).await.map_err(map_client_error)?;
            out.user("Пользователь", &user)?;
        }
        Command::MyPosts => {
            let posts = client.my_posts().await.map_err(map_client_error)?;
            out.posts(&posts)?;
        }
    }

    Ok(())
}

async fn run_topic_command(client: &QuillClient, out: &Output, command: TopicCommand) -> Result<()> {
    match command {
        TopicCommand::List => {
            let topics = client.list_topics().await.map_err(map_client_error)?;
            out.topics(&topics)?;
        }
        TopicCommand::Get { url } => {
            let topic = client.get_topic(&url).await.map_err(map_client_error)?;
            out.topics(std::slice::from_ref(&topic))?;
        }
        TopicCommand::Create {
            title,
            description,
            url,
        } => {
            let topic = client
                .create_topic(&title, &description, url.as_deref())
                .await
                .map_err(map_client_error)?;
            out.topics(std::slice::from_ref(&topic))?;
        }
        TopicCommand::Mine => {
            let topics = client.my_topics().await.map_err(map_client_error)?;
            out.topics(&topics)?;
        }
    }
    Ok(())
}

fn resolve_server(flag: Option<String>, env: Option<String>) -> String {
    let raw = flag
        .or(env)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    normalize_server(raw.trim().to_string())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_paragraph(raw: &str) -> Result<NewParagraph, String> {
    let (kind, content) = match raw.split_once(':') {
        Some((kind, content)) if is_kind(kind) => (kind.trim(), content),
        _ => ("text", raw),
    };
    if content.trim().is_empty() {
        return Err("содержимое блока не должно быть пустым".to_string());
    }
    Ok(NewParagraph {
        kind: kind.to_string(),
        content: content.to_string(),
    })
}

fn is_kind(candidate: &str) -> bool {
    let candidate = candidate.trim();
    !candidate.is_empty()
        && candidate.len() <= 32
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn merge_update(
    current: &Post,
    title: Option<String>,
    description: Option<String>,
    text: Option<String>,
) -> PostUpdate {
    PostUpdate {
        title: title.unwrap_or_else(|| current.title.clone()),
        description: description.unwrap_or_else(|| current.description.clone()),
        text: text.unwrap_or_else(|| current.text.clone()),
    }
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn persist_token(client: &QuillClient) -> io::Result<()> {
    if let Some(token) = client.get_token() {
        fs::write(TOKEN_FILE, token)?;
    }
    Ok(())
}

fn map_client_error(err: QuillClientError) -> anyhow::Error {
    let message = match err {
        QuillClientError::Unauthorized => {
            "требуется авторизация: выполните `quill-cli login ...` или `quill-cli register ...`"
                .to_string()
        }
        QuillClientError::Forbidden => "операция доступна только автору".to_string(),
        QuillClientError::NotFound => "ресурс не найден".to_string(),
        QuillClientError::Conflict(message) => format!("конфликт: {message}"),
        QuillClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        QuillClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

/// Печать ответов: человекочитаемо или JSON при `--json`.
struct Output {
    json: bool,
}

impl Output {
    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<bool> {
        if !self.json {
            return Ok(false);
        }
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(true)
    }

    fn auth(&self, title: &str, auth: &AuthResponse) -> Result<()> {
        if self.print_json(auth)? {
            return Ok(());
        }
        println!("{title}");
        println!("token: {}", auth.access_token);
        print_user(&auth.user);
        Ok(())
    }

    fn user(&self, title: &str, user: &User) -> Result<()> {
        if self.print_json(user)? {
            return Ok(());
        }
        println!("{title}");
        print_user(user);
        Ok(())
    }

    fn post(&self, title: &str, post: &Post) -> Result<()> {
        if self.print_json(post)? {
            return Ok(());
        }
        println!("{title}");
        print_post(post);
        Ok(())
    }

    fn detail(&self, title: &str, detail: &PostDetail) -> Result<()> {
        if self.print_json(detail)? {
            return Ok(());
        }
        println!("{title}");
        print_post(&detail.post);
        println!("paragraphs: {}", detail.paragraphs.len());
        for paragraph in &detail.paragraphs {
            println!("  - [{}] {} ({})", paragraph.kind, paragraph.content, paragraph.uuid);
        }
        Ok(())
    }

    fn paragraph(&self, title: &str, paragraph: &Paragraph) -> Result<()> {
        if self.print_json(paragraph)? {
            return Ok(());
        }
        println!("{title}");
        println!("uuid: {}", paragraph.uuid);
        println!("type: {}", paragraph.kind);
        println!("content: {}", paragraph.content);
        Ok(())
    }

    fn posts(&self, posts: &[Post]) -> Result<()> {
        if self.print_json(posts)? {
            return Ok(());
        }
        println!("Постов: {}", posts.len());
        for post in posts {
            let author = post
                .user
                .as_ref()
                .map(|u| u.username.as_str())
                .unwrap_or("?");
            println!(
                "- [{}] {} (uuid={}, author={}, likes={})",
                post.id, post.title, post.uuid, author, post.likes
            );
        }
        if let Some(last) = posts.last() {
            println!("следующая страница: --cursor {}", last.id);
        }
        Ok(())
    }

    fn topics(&self, topics: &[Topic]) -> Result<()> {
        if self.print_json(topics)? {
            return Ok(());
        }
        for topic in topics {
            println!("- {} [{}] {}", topic.title, topic.url, topic.description);
        }
        Ok(())
    }
}

fn print_user(user: &User) {
    println!("user:");
    println!("  uuid: {}", user.uuid);
    println!("  username: {}", user.username);
    println!("  url: {}", user.url);
    println!("  created: {}", user.created);
}

fn print_post(post: &Post) {
    println!("id: {}", post.id);
    println!("uuid: {}", post.uuid);
    println!("title: {}", post.title);
    println!("description: {}", post.description);
    println!("text: {}", post.text);
    println!("likes: {}", post.likes);
    if let Some(user) = &post.user {
        println!("author: {}", user.username);
    }
    println!("created_at: {}", post.created_at);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://example.com:8080".to_string());
        assert_eq!(s, "https://example.com:8080");
    }

    #[test]
    fn resolve_server_prefers_flag_then_env() {
        assert_eq!(resolve_server(None, None), DEFAULT_SERVER);
        assert_eq!(
            resolve_server(None, Some("localhost:9000".to_string())),
            "http://localhost:9000"
        );
        assert_eq!(
            resolve_server(
                Some("https://quill.dev".to_string()),
                Some("localhost:9000".to_string())
            ),
            "https://quill.dev"
        );
    }

    #[test]
    fn parse_paragraph_reads_kind_prefix() {
        let paragraph = parse_paragraph("code:fn main() {}").expect("must parse");
        assert_eq!(paragraph.kind, "code");
        assert_eq!(paragraph.content, "fn main() {}");
    }

    #[test]
    fn parse_paragraph_defaults_to_text() {
        let paragraph = parse_paragraph("just words").expect("must parse");
        assert_eq!(paragraph.kind, "text");
        assert_eq!(paragraph.content, "just words");

        let paragraph = parse_paragraph("see https://example.com").expect("must parse");
        assert_eq!(paragraph.kind, "text");
        assert_eq!(paragraph.content, "see https://example.com");
    }

    #[test]
    fn parse_paragraph_rejects_empty_content() {
        assert!(parse_paragraph("code:   ").is_err());
    }

    #[test]
    fn create_command_collects_repeated_paragraphs() {
        let cli = Cli::try_parse_from([
            "quill-cli",
            "create",
            "--topic",
            "tech",
            "--title",
            "Hello",
            "--paragraph",
            "intro",
            "--paragraph",
            "code:let x = 1;",
        ])
        .expect("arguments must parse");

        match cli.command {
            Command::Create {
                topic, paragraphs, ..
            } => {
                assert_eq!(topic, "tech");
                assert_eq!(paragraphs.len(), 2);
                assert_eq!(paragraphs[1].kind, "code");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_command_parses_cursor_flags() {
        let cli = Cli::try_parse_from(["quill-cli", "list", "--cursor", "15", "--recent"])
            .expect("arguments must parse");
        match cli.command {
            Command::List {
                cursor,
                recent,
                topic,
            } => {
                assert_eq!(cursor, Some(15));
                assert!(recent);
                assert!(topic.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn topics_subcommand_and_global_flags_parse() {
        let cli = Cli::try_parse_from([
            "quill-cli",
            "topics",
            "create",
            "--title",
            "Rust",
            "--json",
            "--server",
            "localhost:1",
        ])
        .expect("arguments must parse");
        assert!(cli.json);
        assert_eq!(cli.server.as_deref(), Some("localhost:1"));
        assert!(matches!(
            cli.command,
            Command::Topics(TopicCommand::Create { url: None, .. })
        ));
    }

    #[test]
    fn malformed_uuid_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["quill-cli", "get", "--uuid", "nope"]).is_err());
    }

    #[test]
    fn parse_token_content_rejects_blank() {
        assert!(parse_token_content("   ").is_none());
        assert_eq!(parse_token_content(" a.b.c ").as_deref(), Some("a.b.c"));
    }
}
