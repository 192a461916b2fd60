//! Ошибки генерации карты
//!
//! Генерация детерминирована: повтор с теми же параметрами воспроизводит ту же ошибку,
//! поэтому ни один этап не делает повторных попыток и не возвращает частичный результат.

use thiserror::Error;

/// Вид сущности графа, используется в сообщениях об ошибках кодека
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Center,
    Edge,
    Corner,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Center => "center",
            EntityKind::Edge => "edge",
            EntityKind::Corner => "corner",
        };
        f.write_str(name)
    }
}

/// Ошибки восстановления графа из проводной формы
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconstructionError {
    /// Идентификатор записи не помещается в плотное пространство id
    #[error("{kind} id {id} is out of range (count {count})")]
    IdOutOfRange {
        kind: EntityKind,
        id: u32,
        count: usize,
    },

    /// Две записи одного вида с одинаковым id
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: EntityKind, id: u32 },

    /// Ссылка на несуществующую сущность
    #[error("{owner} {owner_id}: field `{field}` references missing {target} {target_id}")]
    DanglingReference {
        owner: EntityKind,
        owner_id: u32,
        field: &'static str,
        target: EntityKind,
        target_id: u32,
    },

    /// Текст не разбирается как проводной граф
    #[error("malformed wire graph: {0}")]
    Malformed(String),
}

/// Общая ошибка конвейера генерации
#[derive(Debug, Error)]
pub enum MapError {
    /// Параметры вне допустимой области; генерация не начинается
    #[error("invalid map config: {0}")]
    InvalidConfig(String),

    /// Вырожденный набор точек (меньше трёх, все на одной прямой)
    #[error("graph construction failed: {0}")]
    GraphConstruction(String),

    /// Нарушен внутренний инвариант классификации. Это дефект, а не ошибка ввода
    #[error("classification invariant violated: {0}")]
    Classification(String),

    #[error("graph reconstruction failed: {0}")]
    Reconstruction(#[from] ReconstructionError),

    /// Сработал токен отмены или истёк дедлайн
    #[error("map generation cancelled")]
    Cancelled,
}

pub type MapResult<T> = Result<T, MapError>;
