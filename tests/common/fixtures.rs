//! Static uploads used across harnesses.

/// Canonical export header.
pub const HEADER: &str = "id,user,chat,query,model,stage,status,feedbackScore,date,time,retryCount";

/// A small, well-formed pilot upload spanning three days.
pub const UPLOAD_PILOT: &str = "\
id,user,chat,query,model,stage,status,feedbackScore,date,time,retryCount
Q-001,user_01,C-101,일별 매출 현황 보여줘,GPT-4,5. 결과 요약,SUCCESS,5,2025-12-17,09:12:00,0
Q-002,user_02,C-102,VIP 고객 리스트,Claude 3.5,3. 메타 조회,FAIL,2,2025-12-17,10:40:10,1
Q-003,user_01,C-101,\"결제 수단별 매출, 파이 차트로\",GPT-4,5. 결과 요약,SUCCESS,4,2025-12-18,11:05:43,0
Q-004,user_03,C-103,서버 로그 에러 비율,Llama 3,4. SQL 생성,ERROR,,2025-12-18,14:22:01,2
Q-005,manager,C-104,강남구 배달 지연,GPT-4,1. 모델 상태 확인,BLOCKED,1,2025-12-19,16:00:00,0
Q-006,user_02,C-105,\"\"\"Winter Sale\"\" 신규 고객\",Claude 3.5,5. 결과 요약,SUCCESS,,2025-12-19,17:45:30,3";

/// The same upload in the legacy layout: `feedback` header, mixed-case
/// header tokens, an extra column and CRLF line endings.
pub const UPLOAD_LEGACY: &str = "ID,User,Chat,Query,Model,Stage,Latency,Status,feedback,Date,Time,RetryCount\r\n\
Q-101,user_05,C-201,월별 사용자 추이,GPT-4,2. 질문 분석,1.4s,FAIL,null,2025-12-20,09:00:00,1\r\n\
Q-102,user_05,C-201,월별 사용자 추이,GPT-4,5. 결과 요약,0.9s,SUCCESS,5,2025-12-20,09:01:30,0\r\n";

/// Rows that exercise every normalizer issue kind.
pub const UPLOAD_DIRTY: &str = "\
id,date,time,status,stage,feedbackScore,retryCount
Q-1,2025-12-18,09:00:00,SUCCESS,5. 결과 요약,7,0
Q-2,2025-12-18,09:10:00,FAIL,3. 메타 조회,3,many
short,row
,,10:00:00,SUCCESS,5. 결과 요약,5,0
Q-5,2025-12-19,11:00:00,SUCCESS,5. 결과 요약,4,1";
